use crate::model::network::{CustomerId, Tick, VehicleId};
use derive_more::Display;

/// an upstream protocol violation observed while reconstructing state. the
/// offending event is still applied so viewers see what the log says.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvariantWarning {
    #[display("vehicle {vehicle_id} load driven below zero to {load}")]
    NegativeLoad { vehicle_id: VehicleId, load: i64 },
    #[display("vehicle {vehicle_id} unmatched customer {customer_id} which it was not matched to")]
    UnmatchedUnknownCustomer {
        vehicle_id: VehicleId,
        customer_id: CustomerId,
    },
    #[display("customer {customer_id} matched to vehicle {to} while still matched to vehicle {from}")]
    CustomerReassigned {
        customer_id: CustomerId,
        from: VehicleId,
        to: VehicleId,
    },
    #[display("tick went backwards from {previous} to {current}")]
    TickRegressed { previous: Tick, current: Tick },
}
