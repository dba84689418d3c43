use crate::app::config::InterpolationConfig;
use fleet_replay_core::algorithm::interpolation::{InterpolationBuffer, KeyframeUpdate};
use fleet_replay_core::algorithm::reconstruct::{LegTiming, Notification, VehiclePosition};
use fleet_replay_core::model::network::{EdgeWeightTable, NodeId, NodePositionTable, VehicleId};
use nalgebra::{UnitQuaternion, Vector3};
use std::collections::HashMap;
use std::sync::Arc;
use uom::si::f64::{Time, Velocity};
use uom::si::time::second;

/// smoothed motion of every vehicle seen in the log, in node position
/// coordinates.
///
/// each vehicle has its own [`InterpolationBuffer`]. position notifications
/// become keyframes placing the vehicle `overshoot` along the edge toward
/// `target0`, moving so that it reaches `target0` when the leg's travel time
/// has elapsed. a vehicle is placed at the start of its first route; later
/// route updates start at a node it has already passed and do not move it.
/// keyframes are only produced for nodes with a known position.
pub struct VehiclePlayback {
    weights: Arc<EdgeWeightTable>,
    positions: Arc<NodePositionTable>,
    speed: Velocity,
    config: InterpolationConfig,
    buffers: HashMap<VehicleId, InterpolationBuffer>,
}

impl VehiclePlayback {
    pub fn new(
        weights: Arc<EdgeWeightTable>,
        positions: Arc<NodePositionTable>,
        speed: Velocity,
        config: InterpolationConfig,
    ) -> Self {
        Self {
            weights,
            positions,
            speed,
            config,
            buffers: HashMap::new(),
        }
    }

    pub fn reset(&mut self) {
        self.buffers.clear();
    }

    /// turns a notification into a keyframe for the vehicle it concerns
    pub fn observe(&mut self, notification: &Notification) {
        match notification {
            Notification::RouteBegun {
                vehicle_id,
                first_three_nodes,
            } => self.observe_route(*vehicle_id, first_three_nodes),
            Notification::VehiclePosition(position) => self.observe_position(position),
            Notification::VehiclesArrived { vehicle_ids } => {
                for vehicle_id in vehicle_ids {
                    self.buffers.remove(vehicle_id);
                }
            }
            _ => {}
        }
    }

    /// advances every vehicle's playback clock by `delta`
    pub fn tick(&mut self, delta: Time) {
        for buffer in self.buffers.values_mut() {
            buffer.update(delta);
        }
    }

    pub fn position(&self, vehicle_id: VehicleId) -> Option<Vector3<f64>> {
        self.buffers
            .get(&vehicle_id)
            .map(InterpolationBuffer::current_position)
    }

    pub fn orientation(&self, vehicle_id: VehicleId) -> Option<UnitQuaternion<f64>> {
        self.buffers
            .get(&vehicle_id)
            .map(InterpolationBuffer::current_orientation)
    }

    pub fn buffer(&self, vehicle_id: VehicleId) -> Option<&InterpolationBuffer> {
        self.buffers.get(&vehicle_id)
    }

    pub fn vehicle_count(&self) -> usize {
        self.buffers.len()
    }

    fn node(&self, node: NodeId) -> Option<Vector3<f64>> {
        self.positions
            .position(node)
            .map(|p| Vector3::new(p.x, p.y, 0.0))
    }

    fn observe_route(&mut self, vehicle_id: VehicleId, nodes: &[NodeId]) {
        let Some(start) = nodes.first().and_then(|n| self.node(*n)) else {
            log::debug!("no position for the start of vehicle {vehicle_id}'s route");
            return;
        };
        let timing = LegTiming::from_route_start(nodes, &self.weights, self.speed);
        let toward = nodes.get(1).and_then(|n| self.node(*n)).unwrap_or(start);
        let update = moving_toward(start, toward, timing.to_target0);
        self.buffer_mut(vehicle_id).append_keyframe(update);
    }

    fn observe_position(&mut self, position: &VehiclePosition) {
        let (Some(current), Some(target0)) = (
            self.node(position.current_node),
            self.node(position.target0),
        ) else {
            log::debug!(
                "no position for nodes {} or {} of vehicle {}",
                position.current_node,
                position.target0,
                position.vehicle_id
            );
            return;
        };
        let weight = self.weights.weight(position.current_node, position.target0);
        let fraction = if weight > 0.0 {
            (position.overshoot / weight).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let placed = current + (target0 - current) * fraction;
        let timing = LegTiming::from_position(position, &self.weights, self.speed);
        let update = moving_toward(placed, target0, timing.to_target0);
        self.buffer_mut(position.vehicle_id).append_keyframe(update);
    }

    fn buffer_mut(&mut self, vehicle_id: VehicleId) -> &mut InterpolationBuffer {
        let config = &self.config;
        self.buffers
            .entry(vehicle_id)
            .or_insert_with(|| InterpolationBuffer::new(config.mode, config.buffer_time()))
    }
}

/// a keyframe at `from`, heading toward `to` and arriving after `duration`.
/// a vehicle with nowhere to go keeps its previous heading and is at rest.
fn moving_toward(from: Vector3<f64>, to: Vector3<f64>, duration: Time) -> KeyframeUpdate {
    let direction = to - from;
    let seconds = duration.get::<second>();
    let velocity = if seconds > 0.0 {
        direction / seconds
    } else {
        Vector3::zeros()
    };
    let update = KeyframeUpdate::new().position(from).velocity(velocity);
    if direction.norm() > 0.0 {
        let heading = direction.y.atan2(direction.x);
        update.orientation(UnitQuaternion::from_axis_angle(&Vector3::z_axis(), heading))
    } else {
        update
    }
}
