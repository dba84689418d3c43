use super::SessionError;
use crate::app::config::{InterpolationConfig, ReplayAppConfig};
use fleet_replay_core::algorithm::tail::TailConfig;
use fleet_replay_core::model::instance::{CustomerAppearanceSchedule, ProblemInstance};
use fleet_replay_core::model::network::{EdgeWeightTable, NodePositionTable};
use std::path::PathBuf;
use std::sync::Arc;
use uom::si::f64::Velocity;
use uom::si::velocity::meter_per_second;

/// everything a [`super::ReplaySession`] needs that does not change while
/// replaying: the log location, the road network and the problem instance
/// with its appearance schedule.
#[derive(Debug, Clone)]
pub struct ReplayContext {
    pub log_file: PathBuf,
    pub weights: Arc<EdgeWeightTable>,
    pub positions: Arc<NodePositionTable>,
    pub instance: Arc<ProblemInstance>,
    pub schedule: Arc<CustomerAppearanceSchedule>,
    pub vehicle_speed: Velocity,
    pub tail: TailConfig,
    pub interpolation: InterpolationConfig,
}

impl ReplayContext {
    /// a context with no road network or problem instance
    pub fn new(log_file: PathBuf) -> ReplayContext {
        ReplayContext {
            log_file,
            weights: Arc::new(EdgeWeightTable::new()),
            positions: Arc::new(NodePositionTable::new()),
            instance: Arc::new(ProblemInstance::default()),
            schedule: Arc::new(CustomerAppearanceSchedule::new()),
            vehicle_speed: Velocity::new::<meter_per_second>(
                ReplayAppConfig::default_vehicle_speed_mps(),
            ),
            tail: TailConfig::default(),
            interpolation: InterpolationConfig::default(),
        }
    }

    /// loads every input file named by the configuration
    pub fn from_config(config: &ReplayAppConfig) -> Result<ReplayContext, SessionError> {
        let weights = match &config.edge_file {
            Some(file) => EdgeWeightTable::from_file(file)?,
            None => EdgeWeightTable::new(),
        };
        let positions = match &config.node_file {
            Some(file) => NodePositionTable::from_file(file)?,
            None => NodePositionTable::new(),
        };
        let instance = match &config.problem_file {
            Some(file) => ProblemInstance::from_file(file)?,
            None => ProblemInstance::default(),
        };
        let schedule = instance.schedule.clone();
        log::info!(
            "replay context: {} edge weights, {} node positions, {} vehicles, {} customers",
            weights.len(),
            positions.len(),
            instance.vehicles.len(),
            instance.customers.len()
        );
        Ok(ReplayContext {
            log_file: config.log_file.clone(),
            weights: Arc::new(weights),
            positions: Arc::new(positions),
            instance: Arc::new(instance),
            schedule: Arc::new(schedule),
            vehicle_speed: config.vehicle_speed(),
            tail: config.tail.clone(),
            interpolation: config.interpolation.clone(),
        })
    }
}
