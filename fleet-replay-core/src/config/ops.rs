use super::ReplayConfigurationError;
use std::path::{Path, PathBuf};

/// resolves a file named in a configuration file. relative paths are taken
/// relative to the directory holding the configuration file, when known.
pub fn normalize_file_path(file: &Path, config_dir: Option<&Path>) -> PathBuf {
    match config_dir {
        Some(dir) if file.is_relative() => dir.join(file),
        _ => file.to_path_buf(),
    }
}

/// confirms that an input file exists before any loader runs against it
pub fn require_file(key: &str, file: &Path) -> Result<PathBuf, ReplayConfigurationError> {
    if file.is_file() {
        Ok(file.to_path_buf())
    } else {
        Err(ReplayConfigurationError::FileNotFound {
            key: key.to_string(),
            path: file.to_path_buf(),
        })
    }
}

/// rejects zero, negative and non-finite values for a numeric setting
pub fn require_positive(key: &str, value: f64) -> Result<f64, ReplayConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ReplayConfigurationError::InvalidValue {
            key: key.to_string(),
            message: format!("must be a positive number, found {value}"),
        })
    }
}
