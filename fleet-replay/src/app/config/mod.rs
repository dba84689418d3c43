mod interpolation_config;
mod output_config;
mod replay_app_config;

pub use interpolation_config::InterpolationConfig;
pub use output_config::OutputConfig;
pub use replay_app_config::ReplayAppConfig;
