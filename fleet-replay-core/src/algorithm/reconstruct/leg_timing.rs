use super::VehiclePosition;
use crate::model::network::{EdgeWeightTable, NodeId};
use uom::si::f64::{Length, Time, Velocity};
use uom::si::time::second;

/// travel times of the two legs a vehicle is animated along: from where it
/// is now to `target0`, then from `target0` to `target1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegTiming {
    pub to_target0: Time,
    pub target0_to_target1: Time,
}

impl LegTiming {
    /// timing after a position sample. the vehicle has already covered
    /// `overshoot` of the first leg, so only the remainder is timed. a
    /// remainder below zero (overshoot longer than the edge) is timed as zero.
    pub fn from_position(
        position: &VehiclePosition,
        weights: &EdgeWeightTable,
        speed: Velocity,
    ) -> Self {
        let first = weights.length(position.current_node, position.target0);
        let overshoot = Length::new::<uom::si::length::meter>(position.overshoot);
        let remaining = first - overshoot;
        let to_target0 = if remaining.value > 0.0 {
            remaining / speed
        } else {
            Time::new::<second>(0.0)
        };
        Self {
            to_target0,
            target0_to_target1: weights.length(position.target0, position.target1) / speed,
        }
    }

    /// timing at the start of a route, from its first three nodes. a route
    /// with fewer than three nodes is an idling vehicle and gets unit legs.
    pub fn from_route_start(nodes: &[NodeId], weights: &EdgeWeightTable, speed: Velocity) -> Self {
        match nodes {
            [n0, n1, n2, ..] => Self {
                to_target0: weights.length(*n0, *n1) / speed,
                target0_to_target1: weights.length(*n1, *n2) / speed,
            },
            _ => Self {
                to_target0: Time::new::<second>(1.0),
                target0_to_target1: Time::new::<second>(1.0),
            },
        }
    }
}
