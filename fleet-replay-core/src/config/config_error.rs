use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ReplayConfigurationError {
    #[error("file '{path}' given for '{key}' was not found")]
    FileNotFound { key: String, path: PathBuf },
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("{0}")]
    UserConfigurationError(String),
}
