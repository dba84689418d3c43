use fleet_replay_core::algorithm::interpolation::InterpolationMode;
use fleet_replay_core::config::ReplayConfigurationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uom::si::f64::Time;
use uom::si::time::millisecond;

/// smoothing applied to vehicle playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InterpolationConfig {
    #[serde(default)]
    pub mode: InterpolationMode,
    /// playback delay absorbing jitter between position samples
    #[serde(default = "InterpolationConfig::default_buffer_time_ms")]
    pub buffer_time_ms: f64,
}

impl InterpolationConfig {
    pub fn default_buffer_time_ms() -> f64 {
        150.0
    }

    pub fn buffer_time(&self) -> Time {
        Time::new::<millisecond>(self.buffer_time_ms)
    }

    pub fn validate(&self) -> Result<(), ReplayConfigurationError> {
        if self.buffer_time_ms.is_finite() && self.buffer_time_ms >= 0.0 {
            Ok(())
        } else {
            Err(ReplayConfigurationError::InvalidValue {
                key: "interpolation.buffer_time_ms".to_string(),
                message: format!("must be zero or more, found {}", self.buffer_time_ms),
            })
        }
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            mode: InterpolationMode::default(),
            buffer_time_ms: Self::default_buffer_time_ms(),
        }
    }
}
