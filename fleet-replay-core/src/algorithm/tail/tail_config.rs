use crate::config::{ops, ReplayConfigurationError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TailConfig {
    /// longest wait between two reads of the log when no watch event arrives
    #[serde(default = "TailConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// consecutive failed attempts to watch or read the log before giving up
    #[serde(default = "TailConfig::default_max_watch_retries")]
    pub max_watch_retries: u32,
    /// when false, content already in the log at open time is skipped
    #[serde(default = "TailConfig::default_from_beginning")]
    pub from_beginning: bool,
}

impl TailConfig {
    pub fn default_poll_interval_ms() -> u64 {
        250
    }
    pub fn default_max_watch_retries() -> u32 {
        5
    }
    pub fn default_from_beginning() -> bool {
        true
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ReplayConfigurationError> {
        ops::require_positive("tail.poll_interval_ms", self.poll_interval_ms as f64)?;
        Ok(())
    }
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Self::default_poll_interval_ms(),
            max_watch_retries: Self::default_max_watch_retries(),
            from_beginning: Self::default_from_beginning(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let conf: TailConfig = serde_json::from_str(r#"{"max_watch_retries": 2}"#).unwrap();
        assert_eq!(conf.poll_interval_ms, 250);
        assert_eq!(conf.max_watch_retries, 2);
        assert!(conf.from_beginning);
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let conf = TailConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(conf.validate().is_err());
    }
}
