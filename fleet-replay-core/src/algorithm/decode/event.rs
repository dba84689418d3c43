use super::DecodeError;
use crate::model::network::{CustomerId, NodeId, Tick, VehicleId};
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

/// a decoded dataout line: the tick it was written at plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub tick: Tick,
    pub event: Event,
}

impl LogEvent {
    pub fn new(tick: Tick, event: Event) -> Self {
        Self { tick, event }
    }
}

/// payload of a dataout line, selected by its single-letter tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `R`: full new route for a vehicle, oldest node first
    RouteAssigned {
        vehicle_id: VehicleId,
        nodes: Vec<NodeId>,
    },
    /// `V`: vehicle has passed `current_node` and travelled `overshoot`
    /// further toward the next node of its route
    VehicleSample {
        vehicle_id: VehicleId,
        current_node: NodeId,
        overshoot: f64,
    },
    /// `P`: customers picked up this tick
    Pickup { customer_ids: Vec<CustomerId> },
    /// `D`: customers dropped off this tick
    Dropoff { customer_ids: Vec<CustomerId> },
    /// `L`: one unit of load added to or removed from each listed vehicle
    LoadDelta { entries: Vec<LoadEntry> },
    /// `T`: customers that timed out and leave the simulation
    Timeout { customer_ids: Vec<CustomerId> },
    /// `M`: customers matched to or unmatched from a vehicle
    MatchUpdate {
        vehicle_id: VehicleId,
        entries: Vec<MatchEntry>,
    },
    /// `A`: vehicles that reached their destination
    Arrived { vehicle_ids: Vec<VehicleId> },
}

impl Event {
    pub fn tag(&self) -> char {
        match self {
            Event::RouteAssigned { .. } => 'R',
            Event::VehicleSample { .. } => 'V',
            Event::Pickup { .. } => 'P',
            Event::Dropoff { .. } => 'D',
            Event::LoadDelta { .. } => 'L',
            Event::Timeout { .. } => 'T',
            Event::MatchUpdate { .. } => 'M',
            Event::Arrived { .. } => 'A',
        }
    }
}

/// the magnitude of a signed wire entry. it is never zero and must fit the
/// same 64-bit range as unsigned ids.
fn signed_magnitude(
    value: i128,
    position: usize,
    kind: &'static str,
) -> Result<u64, DecodeError> {
    match u64::try_from(value.unsigned_abs()) {
        Ok(0) => Err(DecodeError::ZeroSignedEntry(position, kind)),
        Ok(magnitude) => Ok(magnitude),
        Err(_) => Err(DecodeError::SignedEntryOutOfRange(position, kind)),
    }
}

/// load change addressed to a vehicle by its 0-based index.
///
/// on the wire, an increment of vehicle `k` is written `k+1` and a
/// decrement `-(k+1)`, so zero never appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadEntry {
    pub vehicle_index: u64,
    pub increment: bool,
}

impl LoadEntry {
    pub fn increment(vehicle_index: u64) -> Self {
        Self {
            vehicle_index,
            increment: true,
        }
    }

    pub fn decrement(vehicle_index: u64) -> Self {
        Self {
            vehicle_index,
            increment: false,
        }
    }

    pub fn from_signed(value: i128, position: usize) -> Result<Self, DecodeError> {
        let magnitude = signed_magnitude(value, position, "load delta")?;
        if value > 0 {
            Ok(Self::increment(magnitude - 1))
        } else {
            Ok(Self::decrement(magnitude - 1))
        }
    }

    pub fn to_signed(&self) -> i128 {
        let magnitude = i128::from(self.vehicle_index) + 1;
        if self.increment {
            magnitude
        } else {
            -magnitude
        }
    }

    /// vehicle ids are 1-based, so index `k` addresses vehicle `k+1`
    pub fn vehicle_id(&self) -> VehicleId {
        VehicleId(self.vehicle_index + 1)
    }

    pub fn delta(&self) -> i64 {
        if self.increment {
            1
        } else {
            -1
        }
    }
}

/// a customer joining (positive on the wire) or leaving (negative) a vehicle's matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEntry {
    Matched(CustomerId),
    Unmatched(CustomerId),
}

impl MatchEntry {
    pub fn from_signed(value: i128, position: usize) -> Result<Self, DecodeError> {
        let customer_id = CustomerId(signed_magnitude(value, position, "match update")?);
        if value > 0 {
            Ok(MatchEntry::Matched(customer_id))
        } else {
            Ok(MatchEntry::Unmatched(customer_id))
        }
    }

    pub fn to_signed(&self) -> i128 {
        match self {
            MatchEntry::Matched(c) => i128::from(c.0),
            MatchEntry::Unmatched(c) => -i128::from(c.0),
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        match self {
            MatchEntry::Matched(c) | MatchEntry::Unmatched(c) => *c,
        }
    }
}

impl Display for LogEvent {
    /// the dataout wire format: `<tick> <tag> <fields...>`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tick, self.event.tag())?;
        let fields = match &self.event {
            Event::RouteAssigned { vehicle_id, nodes } => {
                std::iter::once(vehicle_id.to_string())
                    .chain(nodes.iter().map(|n| n.to_string()))
                    .join(" ")
            }
            Event::VehicleSample {
                vehicle_id,
                current_node,
                overshoot,
            } => format!("{vehicle_id} {current_node} {overshoot}"),
            Event::Pickup { customer_ids }
            | Event::Dropoff { customer_ids }
            | Event::Timeout { customer_ids } => customer_ids.iter().join(" "),
            Event::LoadDelta { entries } => entries.iter().map(|e| e.to_signed()).join(" "),
            Event::MatchUpdate {
                vehicle_id,
                entries,
            } => std::iter::once(vehicle_id.to_string())
                .chain(entries.iter().map(|e| e.to_signed().to_string()))
                .join(" "),
            Event::Arrived { vehicle_ids } => vehicle_ids.iter().join(" "),
        };
        if !fields.is_empty() {
            write!(f, " {fields}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_entry_sign_encoding() {
        for k in [0_u64, 1, 41] {
            let up = LoadEntry::from_signed(k as i128 + 1, 0).unwrap();
            assert_eq!(up, LoadEntry::increment(k));
            assert_eq!(up.delta(), 1);
            assert_eq!(up.to_signed(), k as i128 + 1);

            let down = LoadEntry::from_signed(-(k as i128 + 1), 0).unwrap();
            assert_eq!(down, LoadEntry::decrement(k));
            assert_eq!(down.delta(), -1);
            assert_eq!(down.to_signed(), -(k as i128 + 1));
            assert_eq!(down.vehicle_id(), VehicleId(k + 1));
        }
    }

    #[test]
    fn test_signed_zero_rejected() {
        assert!(LoadEntry::from_signed(0, 2).is_err());
        assert_eq!(
            MatchEntry::from_signed(0, 1),
            Err(DecodeError::ZeroSignedEntry(1, "match update"))
        );
    }

    #[test]
    fn test_signed_extremes() {
        let lowest = LoadEntry::from_signed(i64::MIN as i128, 0).unwrap();
        assert_eq!(lowest, LoadEntry::decrement(i64::MAX as u64));
        assert_eq!(lowest.to_signed(), i64::MIN as i128);
        assert_eq!(lowest.vehicle_id(), VehicleId(1 << 63));

        let widest = MatchEntry::from_signed(-(u64::MAX as i128), 0).unwrap();
        assert_eq!(widest, MatchEntry::Unmatched(CustomerId(u64::MAX)));
        assert_eq!(widest.to_signed(), -(u64::MAX as i128));

        assert_eq!(
            MatchEntry::from_signed(u64::MAX as i128 + 1, 3),
            Err(DecodeError::SignedEntryOutOfRange(3, "match update"))
        );
    }

    #[test]
    fn test_display_wire_format() {
        let e = LogEvent::new(
            Tick(7),
            Event::MatchUpdate {
                vehicle_id: VehicleId(3),
                entries: vec![
                    MatchEntry::Unmatched(CustomerId(40)),
                    MatchEntry::Matched(CustomerId(41)),
                ],
            },
        );
        assert_eq!(e.to_string(), "7 M 3 -40 41");

        let empty = LogEvent::new(Tick(8), Event::Pickup { customer_ids: vec![] });
        assert_eq!(empty.to_string(), "8 P");
    }
}
