use fleet_replay_core::algorithm::reconstruct::VehicleState;
use fleet_replay_core::model::instance::{CustomerSpec, VehicleSpec};
use fleet_replay_core::model::network::{CustomerId, NodeId, VehicleId};
use serde::Serialize;

/// a vehicle's problem instance entry joined with what the log has said
/// about it so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleInfo {
    pub vehicle_id: VehicleId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub capacity: i64,
    pub load: i64,
    /// empty until the first route assignment
    pub route: Vec<NodeId>,
    pub matched_customers: Vec<CustomerId>,
}

impl VehicleInfo {
    pub fn new(vehicle_id: VehicleId, spec: &VehicleSpec, state: Option<&VehicleState>) -> Self {
        Self {
            vehicle_id,
            origin: spec.origin,
            destination: spec.destination,
            capacity: spec.capacity,
            load: state.map(|s| s.load).unwrap_or_default(),
            route: state.and_then(|s| s.route.clone()).unwrap_or_default(),
            matched_customers: state
                .map(|s| s.matched_customers.iter().copied().collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerInfo {
    pub customer_id: CustomerId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub load: i64,
    pub early: u64,
    pub late: i64,
    pub assigned_to: Option<VehicleId>,
}

impl CustomerInfo {
    pub fn new(
        customer_id: CustomerId,
        spec: &CustomerSpec,
        assigned_to: Option<VehicleId>,
    ) -> Self {
        Self {
            customer_id,
            origin: spec.origin,
            destination: spec.destination,
            load: spec.load,
            early: spec.early,
            late: spec.late,
            assigned_to,
        }
    }
}
