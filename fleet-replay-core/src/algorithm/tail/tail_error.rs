use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TailError {
    #[error("failure reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure watching {path}: {message}")]
    Watch { path: PathBuf, message: String },
    #[error("giving up on {path} after {attempts} consecutive failures")]
    RetriesExhausted {
        path: PathBuf,
        attempts: u32,
        #[source]
        last: Box<TailError>,
    },
    #[error("tailer was stopped")]
    Stopped,
}
