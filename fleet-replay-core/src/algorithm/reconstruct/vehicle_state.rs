use crate::model::network::{CustomerId, NodeId};
use indexmap::IndexSet;
use serde::Serialize;

/// what the reconstructor knows about one vehicle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VehicleState {
    /// most recently assigned route, absent until the first `R` line
    pub route: Option<Vec<NodeId>>,
    /// index into `route` of the next unvisited node, or `route.len()` once
    /// the vehicle has nothing left to visit
    pub route_cursor: usize,
    /// signed so that an over-decrement stays visible
    pub load: i64,
    /// customers currently matched to this vehicle, in match order
    pub matched_customers: IndexSet<CustomerId>,
}

impl VehicleState {
    /// the last node the vehicle is believed to have passed
    pub fn last_visited(&self) -> Option<NodeId> {
        let route = self.route.as_ref()?;
        let idx = self.route_cursor.checked_sub(1)?;
        route.get(idx).copied()
    }

    pub fn next_unvisited(&self) -> Option<NodeId> {
        self.route.as_ref()?.get(self.route_cursor).copied()
    }

    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }
}
