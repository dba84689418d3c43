use super::{CustomerInfo, ReplayContext, SessionError, SessionSignal, VehicleInfo};
use crate::app::broadcast::Broadcaster;
use crate::app::playback::VehiclePlayback;
use fleet_replay_core::algorithm::decode;
use fleet_replay_core::algorithm::reconstruct::{Notification, StateReconstructor};
use fleet_replay_core::algorithm::tail::{LogTailer, StopHandle, TailError};
use fleet_replay_core::model::network::{CustomerId, VehicleId};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Instant;
use uom::si::f64::Time;
use uom::si::time::second;

/// counters over the lifetime of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub lines: usize,
    pub skipped: usize,
    pub notifications: usize,
    pub warnings: usize,
    pub broadcast_failures: usize,
}

/// one replay of a dataout log: the tailer, decoder and reconstructor
/// wired together, broadcasting every notification they produce.
///
/// a session is either following its log or idle. [`SessionSignal::RunStopped`]
/// makes it idle and [`SessionSignal::RunStarted`] makes it follow the log
/// again from byte 0. both discard every vehicle, route and buffer learned
/// so far. an idle session never broadcasts.
///
/// [`ReplaySession::stop`] (or the [`StopHandle`] from another thread) ends
/// [`ReplaySession::run_until_stopped`]. a stopped session ignores later
/// [`SessionSignal::RunStarted`] signals.
///
/// a notification the broadcaster rejects is logged and counted. the line it
/// came from is still applied and the lines after it are still read.
pub struct ReplaySession<B: Broadcaster> {
    context: ReplayContext,
    broadcaster: B,
    tailer: LogTailer,
    reconstructor: StateReconstructor,
    playback: VehiclePlayback,
    following: bool,
    stop: StopHandle,
    signal_tx: Sender<SessionSignal>,
    signals: Receiver<SessionSignal>,
    stats: SessionStats,
}

impl<B: Broadcaster> ReplaySession<B> {
    pub fn new(context: ReplayContext, broadcaster: B) -> Self {
        let tailer = LogTailer::open(&context.log_file, context.tail.clone());
        let reconstructor = StateReconstructor::new(context.schedule.clone());
        let playback = VehiclePlayback::new(
            context.weights.clone(),
            context.positions.clone(),
            context.vehicle_speed,
            context.interpolation.clone(),
        );
        let (signal_tx, signals) = mpsc::channel();
        log::info!("replay session created for {}", context.log_file.display());
        Self {
            context,
            broadcaster,
            tailer,
            reconstructor,
            playback,
            following: true,
            stop: StopHandle::default(),
            signal_tx,
            signals,
            stats: SessionStats::default(),
        }
    }

    pub fn context(&self) -> &ReplayContext {
        &self.context
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn reconstructor(&self) -> &StateReconstructor {
        &self.reconstructor
    }

    pub fn playback(&self) -> &VehiclePlayback {
        &self.playback
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// the problem instance entry of a vehicle joined with its reconstructed
    /// route, load and matches
    pub fn vehicle_info(&self, vehicle_id: VehicleId) -> Option<VehicleInfo> {
        let spec = self.context.instance.vehicles.get(&vehicle_id)?;
        Some(VehicleInfo::new(
            vehicle_id,
            spec,
            self.reconstructor.vehicle(vehicle_id),
        ))
    }

    /// the problem instance entry of a customer and the vehicle it is
    /// currently matched to
    pub fn customer_info(&self, customer_id: CustomerId) -> Option<CustomerInfo> {
        let spec = self.context.instance.customers.get(&customer_id)?;
        Some(CustomerInfo::new(
            customer_id,
            spec,
            self.reconstructor.assigned_vehicle(customer_id),
        ))
    }

    /// a sender for run boundary signals, handled between lines by
    /// [`ReplaySession::run_until_stopped`]
    pub fn signal_sender(&self) -> Sender<SessionSignal> {
        self.signal_tx.clone()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        !self.following || self.stop.is_stopped()
    }

    pub fn handle_signal(&mut self, signal: SessionSignal) {
        match signal {
            SessionSignal::RunStarted if self.stop.is_stopped() => {
                log::debug!("session is stopped, ignoring run start");
            }
            SessionSignal::RunStarted => {
                log::info!(
                    "run started, replaying {} from the beginning",
                    self.context.log_file.display()
                );
                self.clear_state();
                self.tailer.restart();
                self.following = true;
            }
            SessionSignal::RunStopped => {
                log::info!("run stopped");
                self.halt();
            }
        }
    }

    /// stops following the log for good. buffered lines are dropped and no
    /// further notifications are broadcast.
    pub fn stop(&mut self) {
        if !self.stop.is_stopped() {
            log::info!("stopping replay of {}", self.context.log_file.display());
        }
        self.stop.stop();
        self.halt();
    }

    fn halt(&mut self) {
        self.following = false;
        self.tailer.stop();
        self.clear_state();
    }

    fn clear_state(&mut self) {
        self.reconstructor.reset();
        self.playback.reset();
    }

    /// decodes and applies one line, broadcasting the notifications it
    /// produced. malformed lines are logged and skipped.
    ///
    /// every notification is offered to the broadcaster even after one is
    /// rejected; the first rejection is returned once the line is done.
    pub fn process_line(&mut self, line: &str) -> Result<Vec<Notification>, SessionError> {
        if self.is_stopped() {
            log::debug!("session is stopped, ignoring '{line}'");
            return Ok(vec![]);
        }
        self.stats.lines += 1;
        let record = match decode::decode(line) {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(vec![]),
            Err(e) => {
                self.stats.skipped += 1;
                log::warn!("skipping line '{line}': {e}");
                return Ok(vec![]);
            }
        };

        let notifications = self.reconstructor.apply(&record);
        self.stats.warnings += self.reconstructor.drain_warnings().len();
        let mut emitted = Vec::with_capacity(notifications.len());
        let mut failure = None;
        for notification in notifications {
            if self.stop.is_stopped() {
                break;
            }
            self.playback.observe(&notification);
            match self.broadcaster.broadcast(&notification) {
                Ok(()) => self.stats.notifications += 1,
                Err(e) => {
                    log::warn!("failed to broadcast {}: {e}", notification.name());
                    self.stats.broadcast_failures += 1;
                    failure.get_or_insert(e);
                }
            }
            emitted.push(notification);
        }
        match failure {
            None => Ok(emitted),
            Some(e) => Err(SessionError::Broadcast(e)),
        }
    }

    /// processes every complete line currently in the log without waiting
    /// for more, returning how many lines were read. a broadcast failure is
    /// returned after the whole batch has been applied.
    pub fn drain(&mut self) -> Result<usize, SessionError> {
        if self.is_stopped() {
            return Ok(0);
        }
        let lines = self.poll()?;
        let mut failure = None;
        for line in lines.iter() {
            if let Err(e) = self.process_line(line) {
                failure.get_or_insert(e);
            }
        }
        match failure {
            None => Ok(lines.len()),
            Some(e) => Err(e),
        }
    }

    /// follows the log until stopped, handling run signals between lines and
    /// advancing vehicle playback by wall clock time.
    pub fn run_until_stopped(&mut self) -> Result<(), SessionError> {
        let mut last_frame = Instant::now();
        loop {
            while let Ok(signal) = self.signals.try_recv() {
                self.handle_signal(signal);
            }
            if self.stop.is_stopped() {
                self.stop();
                return Ok(());
            }
            if !self.following {
                self.wait_for_signal();
                continue;
            }

            let lines = self.poll()?;
            for line in lines.iter() {
                // rejected notifications are already logged and counted
                let _ = self.process_line(line);
            }

            let now = Instant::now();
            let elapsed = Time::new::<second>((now - last_frame).as_secs_f64());
            self.playback.tick(elapsed);
            last_frame = now;

            if lines.is_empty() {
                if let Err(e) = self.tailer.wait_for_change() {
                    return Err(self.fail(e));
                }
            }
        }
    }

    fn poll(&mut self) -> Result<Vec<String>, SessionError> {
        match self.tailer.poll_lines() {
            Ok(lines) => Ok(lines),
            // only an explicit stop stops the tailer
            Err(TailError::Stopped) => Ok(vec![]),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, error: TailError) -> SessionError {
        log::error!("{error}");
        self.stop();
        SessionError::Tail(error)
    }

    fn wait_for_signal(&mut self) {
        match self.signals.recv_timeout(self.context.tail.poll_interval()) {
            Ok(signal) => self.handle_signal(signal),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {}
        }
    }
}
