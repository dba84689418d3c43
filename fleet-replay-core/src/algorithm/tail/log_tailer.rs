use super::{TailConfig, TailError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::fs::{File, Metadata};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::SystemTime;

type WatchEvents = Receiver<notify::Result<notify::Event>>;

/// shared flag that stops a [`LogTailer`] from another thread. the tailer
/// observes it before every read and wait.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// lowers the flag again so the owner can be resumed
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// tells one file at the log path apart from a later file at the same path
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileIdentity {
    #[cfg(unix)]
    inode: (u64, u64),
    created: Option<SystemTime>,
}

impl FileIdentity {
    fn of(metadata: &Metadata) -> FileIdentity {
        #[cfg(unix)]
        use std::os::unix::fs::MetadataExt;
        FileIdentity {
            #[cfg(unix)]
            inode: (metadata.dev(), metadata.ino()),
            created: metadata.created().ok(),
        }
    }
}

/// follows an append-only log file, yielding each complete line once and in
/// file order.
///
/// the containing directory is watched so that waits end as soon as the log
/// changes; reads are driven by the file length so a missed watch event only
/// delays a line by one poll interval. a log that does not exist yet is
/// waited for. a log that shrinks below the read offset, or is replaced by a
/// different file at the same path, is treated as a new run and followed
/// from byte 0.
///
/// watch and read failures are retried up to `max_watch_retries` consecutive
/// times, after which the tailer stops and reports
/// [`TailError::RetriesExhausted`].
pub struct LogTailer {
    path: PathBuf,
    config: TailConfig,
    offset: u64,
    identity: Option<FileIdentity>,
    partial: Vec<u8>,
    ready: VecDeque<String>,
    watch: Option<(RecommendedWatcher, WatchEvents)>,
    failures: u32,
    stop: StopHandle,
}

impl LogTailer {
    pub fn open<P: AsRef<Path>>(path: P, config: TailConfig) -> LogTailer {
        let path = path.as_ref().to_path_buf();
        let offset = if config.from_beginning {
            0
        } else {
            std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0)
        };
        log::info!("tailing {} from byte {}", path.display(), offset);
        LogTailer {
            path,
            config,
            offset,
            identity: None,
            partial: Vec::new(),
            ready: VecDeque::new(),
            watch: None,
            failures: 0,
            stop: StopHandle::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// bytes of the log consumed so far, including any buffered partial line
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// unregisters the watch and discards buffered lines. later reads return
    /// [`TailError::Stopped`] until [`LogTailer::restart`] is called.
    pub fn stop(&mut self) {
        self.stop.stop();
        self.release();
    }

    /// discards the read offset and all buffered content so the next read
    /// starts from byte 0 of whatever file is at the path.
    pub fn restart(&mut self) {
        log::info!("restarting tail of {} from byte 0", self.path.display());
        self.stop.reset();
        self.offset = 0;
        self.identity = None;
        self.partial.clear();
        self.ready.clear();
        self.failures = 0;
    }

    /// reads whatever complete lines have been appended since the last call,
    /// without blocking.
    pub fn poll_lines(&mut self) -> Result<Vec<String>, TailError> {
        self.fill()?;
        Ok(self.ready.drain(..).collect())
    }

    fn release(&mut self) {
        if self.watch.take().is_some() {
            log::debug!("unwatched {}", self.path.display());
        }
        self.partial.clear();
        self.ready.clear();
    }

    fn fill(&mut self) -> Result<(), TailError> {
        if self.stop.is_stopped() {
            self.release();
            return Err(TailError::Stopped);
        }
        let mut failed = false;

        let watched = match self.ensure_watch() {
            Ok(()) => self.drain_watch_events(),
            Err(e) => Err(e),
        };
        if let Err(failure) = watched {
            failed = true;
            self.record_failure(failure)?;
        }

        match self.read_appended() {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => self.forget_missing_file(),
            Err(source) => {
                failed = true;
                let failure = TailError::Io {
                    path: self.path.clone(),
                    source,
                };
                self.record_failure(failure)?;
            }
        }

        if !failed {
            self.failures = 0;
        }
        Ok(())
    }

    fn record_failure(&mut self, failure: TailError) -> Result<(), TailError> {
        self.failures += 1;
        if self.failures > self.config.max_watch_retries {
            log::error!("{failure}; giving up on {}", self.path.display());
            self.stop.stop();
            self.release();
            return Err(TailError::RetriesExhausted {
                path: self.path.clone(),
                attempts: self.failures,
                last: Box::new(failure),
            });
        }
        log::warn!(
            "{failure} (attempt {} of {})",
            self.failures,
            self.config.max_watch_retries + 1
        );
        Ok(())
    }

    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// the log itself may not exist yet, so its directory is watched
    fn ensure_watch(&mut self) -> Result<(), TailError> {
        if self.watch.is_some() {
            return Ok(());
        }
        let dir = self.watch_dir();
        let to_error = |e: notify::Error| TailError::Watch {
            path: dir.clone(),
            message: e.to_string(),
        };
        let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(tx).map_err(to_error)?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(to_error)?;
        log::debug!("watching {} for changes to {}", dir.display(), self.path.display());
        self.watch = Some((watcher, rx));
        Ok(())
    }

    fn concerns_log(&self, event: &notify::Event) -> bool {
        let name = self.path.file_name();
        event.paths.iter().any(|p| p.file_name() == name)
    }

    fn drain_watch_events(&mut self) -> Result<(), TailError> {
        let Some((_, events)) = &self.watch else {
            return Ok(());
        };
        let mut failure = None;
        while let Ok(received) = events.try_recv() {
            match received {
                Ok(event) if self.concerns_log(&event) => {
                    log::debug!("{:?} on {}", event.kind, self.path.display());
                }
                Ok(_) => {}
                Err(e) => failure = Some(e),
            }
        }
        match failure {
            None => Ok(()),
            Some(e) => {
                self.watch = None;
                Err(TailError::Watch {
                    path: self.watch_dir(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// blocks for at most one poll interval, returning early when the watched
    /// directory reports a change.
    pub fn wait_for_change(&mut self) -> Result<(), TailError> {
        let interval = self.config.poll_interval();
        let received = match &self.watch {
            Some((_, events)) => events.recv_timeout(interval),
            None => {
                std::thread::sleep(interval);
                return Ok(());
            }
        };
        match received {
            Ok(Ok(_)) | Err(RecvTimeoutError::Timeout) => Ok(()),
            Ok(Err(e)) => {
                self.watch = None;
                let failure = TailError::Watch {
                    path: self.watch_dir(),
                    message: e.to_string(),
                };
                self.record_failure(failure)
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.watch = None;
                Ok(())
            }
        }
    }

    fn read_appended(&mut self) -> std::io::Result<()> {
        let mut file = File::open(&self.path)?;
        let metadata = file.metadata()?;
        let len = metadata.len();
        let identity = FileIdentity::of(&metadata);
        if self.identity.as_ref().is_some_and(|known| *known != identity) {
            log::info!(
                "{} was replaced, following the new file from byte 0",
                self.path.display()
            );
            self.offset = 0;
            self.partial.clear();
        } else if len < self.offset {
            log::info!(
                "{} shrank from {} to {} bytes, following from byte 0",
                self.path.display(),
                self.offset,
                len
            );
            self.offset = 0;
            self.partial.clear();
        }
        self.identity = Some(identity);
        if len == self.offset {
            return Ok(());
        }
        file.seek(SeekFrom::Start(self.offset))?;
        let mut bytes = Vec::new();
        let read = file.take(len - self.offset).read_to_end(&mut bytes)?;
        self.offset += read as u64;
        self.split_lines(&bytes);
        Ok(())
    }

    fn forget_missing_file(&mut self) {
        if self.offset > 0 || !self.partial.is_empty() {
            log::info!(
                "{} was removed, waiting for it to reappear",
                self.path.display()
            );
            self.offset = 0;
            self.partial.clear();
        }
        self.identity = None;
    }

    fn split_lines(&mut self, bytes: &[u8]) {
        self.partial.extend_from_slice(bytes);
        let Some(last) = self.partial.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let rest = self.partial.split_off(last + 1);
        let complete = std::mem::replace(&mut self.partial, rest);
        for line in complete[..last].split(|b| *b == b'\n') {
            let text = String::from_utf8_lossy(line);
            self.ready.push_back(text.trim_end_matches('\r').to_string());
        }
    }
}

/// blocking iteration over the log. yields lines as they are appended and
/// ends once the tailer is stopped or has given up.
impl Iterator for LogTailer {
    type Item = Result<String, TailError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.stop.is_stopped() {
                self.release();
                return None;
            }
            if let Some(line) = self.ready.pop_front() {
                return Some(Ok(line));
            }
            let progress = self.fill().and_then(|_| {
                if self.ready.is_empty() {
                    self.wait_for_change()
                } else {
                    Ok(())
                }
            });
            match progress {
                Ok(()) => {}
                Err(TailError::Stopped) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::time::Duration;

    fn quick() -> TailConfig {
        TailConfig {
            poll_interval_ms: 10,
            ..Default::default()
        }
    }

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    #[test]
    fn test_partial_line_is_held_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n2 P");
        let mut tailer = LogTailer::open(&path, quick());

        assert_eq!(tailer.poll_lines().unwrap(), vec!["1 P 3"]);
        assert!(tailer.poll_lines().unwrap().is_empty());

        append(&path, " 4\r\n3 T 5\n");
        assert_eq!(tailer.poll_lines().unwrap(), vec!["2 P 4", "3 T 5"]);
        assert!(tailer.poll_lines().unwrap().is_empty());
    }

    #[test]
    fn test_waits_for_file_to_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        let mut tailer = LogTailer::open(&path, quick());
        for _ in 0..3 {
            assert!(tailer.poll_lines().unwrap().is_empty());
        }
        append(&path, "0 R 1 2 3\n");
        assert_eq!(tailer.poll_lines().unwrap(), vec!["0 R 1 2 3"]);
    }

    #[test]
    fn test_truncated_file_followed_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n2 P 4\n");
        let mut tailer = LogTailer::open(&path, quick());
        assert_eq!(tailer.poll_lines().unwrap().len(), 2);

        std::fs::write(&path, "0 T 9\n").unwrap();
        assert_eq!(tailer.poll_lines().unwrap(), vec!["0 T 9"]);
    }

    #[test]
    fn test_removed_file_followed_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n2 P 4\n");
        let mut tailer = LogTailer::open(&path, quick());
        assert_eq!(tailer.poll_lines().unwrap().len(), 2);

        std::fs::remove_file(&path).unwrap();
        assert!(tailer.poll_lines().unwrap().is_empty());
        assert_eq!(tailer.offset(), 0);
        append(&path, "0 P 1\n1 P 2\n2 P 3\n");
        assert_eq!(tailer.poll_lines().unwrap(), vec!["0 P 1", "1 P 2", "2 P 3"]);
    }

    #[test]
    fn test_recreated_file_followed_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n2 P 4\n");
        let mut tailer = LogTailer::open(&path, quick());
        assert_eq!(tailer.poll_lines().unwrap().len(), 2);

        // longer than the old log, and replaced between two polls
        std::fs::remove_file(&path).unwrap();
        append(&path, "0 R 1 10 11 12\n0 R 2 20 21 22\n");
        assert_eq!(
            tailer.poll_lines().unwrap(),
            vec!["0 R 1 10 11 12", "0 R 2 20 21 22"]
        );
        assert!(tailer.poll_lines().unwrap().is_empty());
    }

    #[test]
    fn test_renamed_over_file_followed_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n");
        let mut tailer = LogTailer::open(&path, quick());
        assert_eq!(tailer.poll_lines().unwrap(), vec!["1 P 3"]);

        let next_run = dir.path().join("dataout.next");
        append(&next_run, "0 T 7\n");
        std::fs::rename(&next_run, &path).unwrap();
        assert_eq!(tailer.poll_lines().unwrap(), vec!["0 T 7"]);
    }

    #[test]
    fn test_restart_rereads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n2 P 4\n");
        let mut tailer = LogTailer::open(&path, quick());
        assert_eq!(tailer.poll_lines().unwrap().len(), 2);

        tailer.restart();
        assert_eq!(tailer.poll_lines().unwrap(), vec!["1 P 3", "2 P 4"]);
    }

    #[test]
    fn test_skip_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n");
        let config = TailConfig {
            from_beginning: false,
            ..quick()
        };
        let mut tailer = LogTailer::open(&path, config);
        assert!(tailer.poll_lines().unwrap().is_empty());
        append(&path, "2 P 4\n");
        assert_eq!(tailer.poll_lines().unwrap(), vec!["2 P 4"]);
    }

    #[test]
    fn test_stop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n");
        let mut tailer = LogTailer::open(&path, quick());
        tailer.stop();
        assert!(tailer.is_stopped());
        assert!(!tailer.is_watching());
        assert!(matches!(tailer.poll_lines(), Err(TailError::Stopped)));
        assert!(tailer.next().is_none());

        tailer.restart();
        assert_eq!(tailer.poll_lines().unwrap(), vec!["1 P 3"]);
    }

    #[test]
    fn test_unwatchable_directory_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dataout.txt");
        let config = TailConfig {
            max_watch_retries: 2,
            ..quick()
        };
        let mut tailer = LogTailer::open(&path, config);
        assert!(tailer.poll_lines().is_ok());
        assert!(tailer.poll_lines().is_ok());
        match tailer.poll_lines() {
            Err(TailError::RetriesExhausted { attempts, last, .. }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, TailError::Watch { .. }));
            }
            other => panic!("expected RetriesExhausted, found {other:?}"),
        }
        assert!(tailer.is_stopped());
    }

    #[test]
    fn test_iterator_blocks_for_new_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataout.txt");
        append(&path, "1 P 3\n");
        let mut tailer = LogTailer::open(&path, quick());
        let stop = tailer.stop_handle();

        let writer_path = path.clone();
        let writer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            append(&writer_path, "2 P 4\n");
        });

        assert_eq!(tailer.next().unwrap().unwrap(), "1 P 3");
        assert_eq!(tailer.next().unwrap().unwrap(), "2 P 4");
        writer.join().unwrap();

        stop.stop();
        assert!(tailer.next().is_none());
    }
}
