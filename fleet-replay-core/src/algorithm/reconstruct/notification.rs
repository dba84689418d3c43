use crate::model::instance::CustomerAppearance;
use crate::model::network::{CustomerId, NodeId, Tick, VehicleId};
use serde::Serialize;

/// where a vehicle is headed after a position sample: it has passed
/// `current_node` by `overshoot` toward `target0`, and continues on to
/// `target1` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehiclePosition {
    pub vehicle_id: VehicleId,
    pub current_node: NodeId,
    pub target0: NodeId,
    pub target1: NodeId,
    pub overshoot: f64,
}

/// a state change emitted by the [`super::StateReconstructor`] for broadcast
/// to viewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    Tick {
        tick: Tick,
    },
    CustomersAppeared {
        tick: Tick,
        customers: Vec<CustomerAppearance>,
    },
    RouteBegun {
        vehicle_id: VehicleId,
        first_three_nodes: Vec<NodeId>,
    },
    RouteUpdated {
        vehicle_id: VehicleId,
        first_three_nodes: Vec<NodeId>,
    },
    VehiclePosition(VehiclePosition),
    CustomersPickedUp {
        customer_ids: Vec<CustomerId>,
    },
    CustomersDroppedOff {
        customer_ids: Vec<CustomerId>,
    },
    CustomersTimedOut {
        customer_ids: Vec<CustomerId>,
    },
    LoadChanged {
        vehicle_id: VehicleId,
        delta: i64,
    },
    Matched {
        vehicle_id: VehicleId,
        customer_id: CustomerId,
    },
    Unmatched {
        vehicle_id: VehicleId,
        customer_id: CustomerId,
    },
    VehiclesArrived {
        vehicle_ids: Vec<VehicleId>,
    },
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::Tick { .. } => "tick",
            Notification::CustomersAppeared { .. } => "customers_appeared",
            Notification::RouteBegun { .. } => "route_begun",
            Notification::RouteUpdated { .. } => "route_updated",
            Notification::VehiclePosition(_) => "vehicle_position",
            Notification::CustomersPickedUp { .. } => "customers_picked_up",
            Notification::CustomersDroppedOff { .. } => "customers_dropped_off",
            Notification::CustomersTimedOut { .. } => "customers_timed_out",
            Notification::LoadChanged { .. } => "load_changed",
            Notification::Matched { .. } => "matched",
            Notification::Unmatched { .. } => "unmatched",
            Notification::VehiclesArrived { .. } => "vehicles_arrived",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_vehicle_position() {
        let n = Notification::VehiclePosition(VehiclePosition {
            vehicle_id: VehicleId(1),
            current_node: NodeId(11),
            target0: NodeId(12),
            target1: NodeId(13),
            overshoot: 2.0,
        });
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "vehicle_position",
                "vehicle_id": 1,
                "current_node": 11,
                "target0": 12,
                "target1": 13,
                "overshoot": 2.0
            })
        );
        assert_eq!(value["event"], n.name());
    }

    #[test]
    fn test_serialize_customers_appeared() {
        let n = Notification::CustomersAppeared {
            tick: Tick(4),
            customers: vec![CustomerAppearance::new(CustomerId(3), NodeId(12))],
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["customers"], json!([[3, 12]]));
        assert_eq!(value["tick"], json!(4));
    }
}
