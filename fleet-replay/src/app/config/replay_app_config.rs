use super::{InterpolationConfig, OutputConfig};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use fleet_replay_core::algorithm::tail::TailConfig;
use fleet_replay_core::config::{ops, ReplayConfigurationError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uom::si::f64::Velocity;
use uom::si::velocity::meter_per_second;

/// prefix of environment variables overriding the configuration file, with
/// `__` separating nested keys, e.g. `FLEET_REPLAY_TAIL__POLL_INTERVAL_MS`.
pub const ENV_PREFIX: &str = "FLEET_REPLAY";

/// top-level configuration of a replay, read from a TOML file.
///
/// ```toml
/// log_file = "dataout.txt"
/// problem_file = "instance.txt"
/// edge_file = "edges.txt"
/// node_file = "nodes.txt"
/// vehicle_speed_mps = 10.0
///
/// [tail]
/// poll_interval_ms = 250
///
/// [interpolation]
/// mode = "hermite"
///
/// [output]
/// type = "file"
/// path = "notifications.jsonl"
/// ```
///
/// relative file paths are resolved against the directory holding the
/// configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReplayAppConfig {
    /// the dataout log written by the simulation
    pub log_file: PathBuf,
    /// problem instance providing the customer appearance schedule
    #[serde(default)]
    pub problem_file: Option<PathBuf>,
    /// road network edge list with travel costs
    #[serde(default)]
    pub edge_file: Option<PathBuf>,
    /// road network node coordinates
    #[serde(default)]
    pub node_file: Option<PathBuf>,
    #[serde(default = "ReplayAppConfig::default_vehicle_speed_mps")]
    pub vehicle_speed_mps: f64,
    #[serde(default)]
    pub tail: TailConfig,
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ReplayAppConfig {
    pub fn default_vehicle_speed_mps() -> f64 {
        10.0
    }

    /// reads a configuration file, applying `FLEET_REPLAY_*` environment
    /// overrides on top of it.
    pub fn from_path(path: &Path) -> Result<ReplayAppConfig, ReplayConfigurationError> {
        let builder = Config::builder().add_source(File::from(path)).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );
        Self::build(builder, path.parent())
    }

    /// reads configuration from a string. `config_path` is only used to
    /// resolve relative file paths.
    pub fn from_str(
        contents: &str,
        config_path: &str,
        format: FileFormat,
    ) -> Result<ReplayAppConfig, ReplayConfigurationError> {
        let builder = Config::builder().add_source(File::from_str(contents, format));
        Self::build(builder, Path::new(config_path).parent())
    }

    fn build(
        builder: ConfigBuilder<config::builder::DefaultState>,
        config_dir: Option<&Path>,
    ) -> Result<ReplayAppConfig, ReplayConfigurationError> {
        let mut conf: ReplayAppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                ReplayConfigurationError::UserConfigurationError(format!(
                    "unable to read replay configuration: {e}"
                ))
            })?;
        conf.normalize_paths(config_dir);
        conf.validate()?;
        Ok(conf)
    }

    fn normalize_paths(&mut self, config_dir: Option<&Path>) {
        let dir = config_dir.filter(|d| !d.as_os_str().is_empty());
        self.log_file = ops::normalize_file_path(&self.log_file, dir);
        for file in [
            &mut self.problem_file,
            &mut self.edge_file,
            &mut self.node_file,
        ]
        .into_iter()
        .flatten()
        {
            *file = ops::normalize_file_path(file, dir);
        }
        if let OutputConfig::File { path } = &mut self.output {
            *path = ops::normalize_file_path(path, dir);
        }
    }

    /// checks every setting that serde cannot. input files other than the
    /// log must exist; the log may appear later.
    pub fn validate(&self) -> Result<(), ReplayConfigurationError> {
        ops::require_positive("vehicle_speed_mps", self.vehicle_speed_mps)?;
        self.tail.validate()?;
        self.interpolation.validate()?;
        for (key, file) in [
            ("problem_file", &self.problem_file),
            ("edge_file", &self.edge_file),
            ("node_file", &self.node_file),
        ] {
            if let Some(file) = file {
                ops::require_file(key, file)?;
            }
        }
        Ok(())
    }

    pub fn vehicle_speed(&self) -> Velocity {
        Velocity::new::<meter_per_second>(self.vehicle_speed_mps)
    }
}
