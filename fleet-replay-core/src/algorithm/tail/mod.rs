mod log_tailer;
mod tail_config;
mod tail_error;

pub use log_tailer::{LogTailer, StopHandle};
pub use tail_config::TailConfig;
pub use tail_error::TailError;
