use crate::model::network::{CustomerId, NodeId, Tick};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// a customer becoming visible at its origin node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerAppearance {
    pub customer_id: CustomerId,
    pub origin: NodeId,
}

impl CustomerAppearance {
    pub fn new(customer_id: CustomerId, origin: NodeId) -> Self {
        Self {
            customer_id,
            origin,
        }
    }
}

// broadcast as `[customer_id, origin]`
impl Serialize for CustomerAppearance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.customer_id, self.origin).serialize(serializer)
    }
}

/// customers grouped by the tick at which they appear, in the order they
/// were listed in the problem instance. built once before replay begins and
/// only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct CustomerAppearanceSchedule {
    appearances: BTreeMap<Tick, Vec<CustomerAppearance>>,
}

impl CustomerAppearanceSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tick: Tick, appearance: CustomerAppearance) {
        self.appearances.entry(tick).or_default().push(appearance);
    }

    /// customers that appear at exactly `tick`, if any.
    pub fn lookup(&self, tick: Tick) -> Option<&[CustomerAppearance]> {
        self.appearances.get(&tick).map(|a| a.as_slice())
    }

    /// total number of scheduled customers
    pub fn len(&self) -> usize {
        self.appearances.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.appearances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_preserves_insertion_order() {
        let mut schedule = CustomerAppearanceSchedule::new();
        schedule.insert(Tick(3), CustomerAppearance::new(CustomerId(9), NodeId(100)));
        schedule.insert(Tick(3), CustomerAppearance::new(CustomerId(7), NodeId(200)));
        schedule.insert(Tick(5), CustomerAppearance::new(CustomerId(8), NodeId(300)));

        let at_three = schedule.lookup(Tick(3)).unwrap();
        assert_eq!(at_three[0].customer_id, CustomerId(9));
        assert_eq!(at_three[1].customer_id, CustomerId(7));
        assert!(schedule.lookup(Tick(4)).is_none());
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn test_appearance_serializes_as_pair() {
        let a = CustomerAppearance::new(CustomerId(12), NodeId(4051));
        assert_eq!(serde_json::to_string(&a).unwrap(), "[12,4051]");
    }
}
