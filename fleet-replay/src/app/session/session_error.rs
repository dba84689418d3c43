use crate::app::broadcast::BroadcastError;
use fleet_replay_core::algorithm::tail::TailError;
use fleet_replay_core::config::ReplayConfigurationError;
use fleet_replay_core::model::instance::InstanceError;
use fleet_replay_core::model::network::NetworkError;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Configuration(#[from] ReplayConfigurationError),
    #[error("failure loading road network: {0}")]
    Network(#[from] NetworkError),
    #[error("failure loading problem instance: {0}")]
    Instance(#[from] InstanceError),
    #[error("failure following dataout log: {0}")]
    Tail(#[from] TailError),
    #[error("failure broadcasting: {0}")]
    Broadcast(#[from] BroadcastError),
}
