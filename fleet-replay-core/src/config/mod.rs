mod config_error;
pub mod ops;

pub use config_error::ReplayConfigurationError;
