/// run boundaries reported by whatever launches the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// a new run is writing a fresh dataout log
    RunStarted,
    /// the run ended; nothing more should be replayed until the next start
    RunStopped,
}
