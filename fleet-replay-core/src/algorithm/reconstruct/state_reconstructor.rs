use super::{InvariantWarning, Notification, VehiclePosition, VehicleState};
use crate::algorithm::decode::{Event, LoadEntry, LogEvent, MatchEntry};
use crate::model::instance::CustomerAppearanceSchedule;
use crate::model::network::{CustomerId, NodeId, Tick, VehicleId};
use std::collections::HashMap;
use std::sync::Arc;

/// number of route nodes consumed when a route is assigned. the first two
/// nodes establish the direction of travel, so the first unvisited node is
/// the third.
const ROUTE_CURSOR_START: usize = 2;

/// folds decoded dataout events into per-vehicle state and the
/// notifications viewers need to render that state.
///
/// events must be applied in file order. every vehicle's state is mutated
/// only by events naming that vehicle.
pub struct StateReconstructor {
    schedule: Arc<CustomerAppearanceSchedule>,
    vehicles: HashMap<VehicleId, VehicleState>,
    assignments: HashMap<CustomerId, VehicleId>,
    last_tick: Option<Tick>,
    warnings: Vec<InvariantWarning>,
}

impl StateReconstructor {
    pub fn new(schedule: Arc<CustomerAppearanceSchedule>) -> Self {
        Self {
            schedule,
            vehicles: HashMap::new(),
            assignments: HashMap::new(),
            last_tick: None,
            warnings: Vec::new(),
        }
    }

    /// discards everything learned from the log so far. the appearance
    /// schedule is kept since it belongs to the problem instance, not the run.
    pub fn reset(&mut self) {
        self.vehicles.clear();
        self.assignments.clear();
        self.last_tick = None;
        self.warnings.clear();
    }

    /// applies one event and returns the notifications it produced, in the
    /// order they should be broadcast.
    ///
    /// a tick different from the previous line's tick first produces a
    /// [`Notification::CustomersAppeared`] (if the schedule has customers for
    /// that tick) and a [`Notification::Tick`].
    pub fn apply(&mut self, record: &LogEvent) -> Vec<Notification> {
        let mut out = Vec::new();
        self.advance_tick(record.tick, &mut out);

        match &record.event {
            Event::RouteAssigned { vehicle_id, nodes } => {
                self.assign_route(*vehicle_id, nodes, &mut out)
            }
            Event::VehicleSample {
                vehicle_id,
                current_node,
                overshoot,
            } => {
                if let Some(position) = self.sample(*vehicle_id, *current_node, *overshoot) {
                    out.push(Notification::VehiclePosition(position));
                }
            }
            Event::Pickup { customer_ids } => out.push(Notification::CustomersPickedUp {
                customer_ids: customer_ids.clone(),
            }),
            Event::Dropoff { customer_ids } => out.push(Notification::CustomersDroppedOff {
                customer_ids: customer_ids.clone(),
            }),
            Event::Timeout { customer_ids } => out.push(Notification::CustomersTimedOut {
                customer_ids: customer_ids.clone(),
            }),
            Event::LoadDelta { entries } => {
                for entry in entries {
                    self.change_load(entry, &mut out);
                }
            }
            Event::MatchUpdate {
                vehicle_id,
                entries,
            } => {
                for entry in entries {
                    self.update_match(*vehicle_id, entry, &mut out);
                }
            }
            Event::Arrived { vehicle_ids } => out.push(Notification::VehiclesArrived {
                vehicle_ids: vehicle_ids.clone(),
            }),
        }
        out
    }

    pub fn vehicle(&self, vehicle_id: VehicleId) -> Option<&VehicleState> {
        self.vehicles.get(&vehicle_id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = (&VehicleId, &VehicleState)> {
        self.vehicles.iter()
    }

    /// the vehicle a customer is currently matched to
    pub fn assigned_vehicle(&self, customer_id: CustomerId) -> Option<VehicleId> {
        self.assignments.get(&customer_id).copied()
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    /// takes the protocol violations observed since the last call
    pub fn drain_warnings(&mut self) -> Vec<InvariantWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn warn(&mut self, warning: InvariantWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn advance_tick(&mut self, tick: Tick, out: &mut Vec<Notification>) {
        if self.last_tick == Some(tick) {
            return;
        }
        if let Some(previous) = self.last_tick.filter(|prev| *prev > tick) {
            self.warn(InvariantWarning::TickRegressed {
                previous,
                current: tick,
            });
        }
        if let Some(customers) = self.schedule.lookup(tick) {
            out.push(Notification::CustomersAppeared {
                tick,
                customers: customers.to_vec(),
            });
        }
        out.push(Notification::Tick { tick });
        self.last_tick = Some(tick);
    }

    fn assign_route(&mut self, vehicle_id: VehicleId, nodes: &[NodeId], out: &mut Vec<Notification>) {
        let state = self.vehicles.entry(vehicle_id).or_default();
        let is_update = state.route.is_some();
        state.route = Some(nodes.to_vec());
        state.route_cursor = ROUTE_CURSOR_START.min(nodes.len());

        let first_three_nodes = nodes.iter().take(3).copied().collect();
        if is_update {
            out.push(Notification::RouteUpdated {
                vehicle_id,
                first_three_nodes,
            });
        } else {
            out.push(Notification::RouteBegun {
                vehicle_id,
                first_three_nodes,
            });
        }
    }

    /// advances the vehicle's route cursor past `current_node` if the sample
    /// agrees with the tracked route. samples that disagree arrive out of
    /// order relative to route assignments and are ignored.
    fn sample(
        &mut self,
        vehicle_id: VehicleId,
        current_node: NodeId,
        overshoot: f64,
    ) -> Option<VehiclePosition> {
        let state = self.vehicles.get_mut(&vehicle_id).filter(|s| s.has_route())?;
        if state.last_visited() != Some(current_node) {
            log::debug!(
                "ignoring stale sample for vehicle {vehicle_id} at node {current_node}, expected {:?}",
                state.last_visited()
            );
            return None;
        }
        let Some(target0) = state.next_unvisited() else {
            log::debug!("ignoring sample for vehicle {vehicle_id}, route already completed");
            return None;
        };
        state.route_cursor += 1;
        let target1 = state.next_unvisited().unwrap_or(target0);
        Some(VehiclePosition {
            vehicle_id,
            current_node,
            target0,
            target1,
            overshoot,
        })
    }

    fn change_load(&mut self, entry: &LoadEntry, out: &mut Vec<Notification>) {
        let vehicle_id = entry.vehicle_id();
        let state = self.vehicles.entry(vehicle_id).or_default();
        state.load += entry.delta();
        let load = state.load;
        if load < 0 {
            self.warn(InvariantWarning::NegativeLoad { vehicle_id, load });
        }
        out.push(Notification::LoadChanged {
            vehicle_id,
            delta: entry.delta(),
        });
    }

    fn update_match(&mut self, vehicle_id: VehicleId, entry: &MatchEntry, out: &mut Vec<Notification>) {
        let state = self.vehicles.entry(vehicle_id).or_default();
        match *entry {
            MatchEntry::Matched(customer_id) => {
                if !state.matched_customers.insert(customer_id) {
                    return;
                }
                let previous = self.assignments.insert(customer_id, vehicle_id);
                if let Some(from) = previous.filter(|v| *v != vehicle_id) {
                    self.warn(InvariantWarning::CustomerReassigned {
                        customer_id,
                        from,
                        to: vehicle_id,
                    });
                }
                out.push(Notification::Matched {
                    vehicle_id,
                    customer_id,
                });
            }
            MatchEntry::Unmatched(customer_id) => {
                let was_matched = state.matched_customers.shift_remove(&customer_id);
                if self.assignments.get(&customer_id) == Some(&vehicle_id) {
                    self.assignments.remove(&customer_id);
                }
                if !was_matched {
                    self.warn(InvariantWarning::UnmatchedUnknownCustomer {
                        vehicle_id,
                        customer_id,
                    });
                }
                out.push(Notification::Unmatched {
                    vehicle_id,
                    customer_id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::decode::decode;
    use crate::model::instance::CustomerAppearance;

    fn reconstructor() -> StateReconstructor {
        let mut schedule = CustomerAppearanceSchedule::new();
        schedule.insert(Tick(6), CustomerAppearance::new(CustomerId(20), NodeId(99)));
        StateReconstructor::new(Arc::new(schedule))
    }

    /// applies a line and returns its notifications without tick bookkeeping
    fn feed(r: &mut StateReconstructor, line: &str) -> Vec<Notification> {
        let record = decode(line).unwrap().unwrap();
        r.apply(&record)
            .into_iter()
            .filter(|n| {
                !matches!(
                    n,
                    Notification::Tick { .. } | Notification::CustomersAppeared { .. }
                )
            })
            .collect()
    }

    #[test]
    fn test_first_route_begins_then_updates() {
        let mut r = reconstructor();
        let first = feed(&mut r, "5 R 1 10 11 12 13");
        assert_eq!(
            first,
            vec![Notification::RouteBegun {
                vehicle_id: VehicleId(1),
                first_three_nodes: vec![NodeId(10), NodeId(11), NodeId(12)],
            }]
        );
        let second = feed(&mut r, "7 R 1 11 12 14");
        assert_eq!(
            second,
            vec![Notification::RouteUpdated {
                vehicle_id: VehicleId(1),
                first_three_nodes: vec![NodeId(11), NodeId(12), NodeId(14)],
            }]
        );
        assert_eq!(r.vehicle(VehicleId(1)).unwrap().route_cursor, 2);
    }

    #[test]
    fn test_sample_advances_cursor() {
        let mut r = reconstructor();
        feed(&mut r, "5 R 1 10 11 12 13");
        let out = feed(&mut r, "6 V 1 11 2");
        assert_eq!(
            out,
            vec![Notification::VehiclePosition(VehiclePosition {
                vehicle_id: VehicleId(1),
                current_node: NodeId(11),
                target0: NodeId(12),
                target1: NodeId(13),
                overshoot: 2.0,
            })]
        );
        let state = r.vehicle(VehicleId(1)).unwrap();
        assert_eq!(state.route_cursor, 3);
        assert_eq!(state.last_visited(), Some(NodeId(12)));

        // last leg: target1 falls back to target0
        let out = feed(&mut r, "7 V 1 12 0");
        assert_eq!(
            out,
            vec![Notification::VehiclePosition(VehiclePosition {
                vehicle_id: VehicleId(1),
                current_node: NodeId(12),
                target0: NodeId(13),
                target1: NodeId(13),
                overshoot: 0.0,
            })]
        );
        assert_eq!(r.vehicle(VehicleId(1)).unwrap().route_cursor, 4);

        // route exhausted
        assert!(feed(&mut r, "8 V 1 13 0").is_empty());
        assert_eq!(r.vehicle(VehicleId(1)).unwrap().route_cursor, 4);
    }

    #[test]
    fn test_stale_sample_is_ignored() {
        let mut r = reconstructor();
        feed(&mut r, "5 R 1 10 11 12 13");
        assert!(feed(&mut r, "6 V 1 10 1").is_empty());
        assert!(feed(&mut r, "6 V 1 12 1").is_empty());
        assert_eq!(r.vehicle(VehicleId(1)).unwrap().route_cursor, 2);
        assert!(r.drain_warnings().is_empty());
    }

    #[test]
    fn test_sample_without_route_is_ignored() {
        let mut r = reconstructor();
        assert!(feed(&mut r, "6 V 3 11 2").is_empty());
        assert!(r.vehicle(VehicleId(3)).is_none());
    }

    #[test]
    fn test_short_route_cursor() {
        let mut r = reconstructor();
        let out = feed(&mut r, "1 R 2 40");
        assert_eq!(
            out,
            vec![Notification::RouteBegun {
                vehicle_id: VehicleId(2),
                first_three_nodes: vec![NodeId(40)],
            }]
        );
        let state = r.vehicle(VehicleId(2)).unwrap();
        assert_eq!(state.route_cursor, 1);
        assert!(feed(&mut r, "2 V 2 40 0").is_empty());
    }

    #[test]
    fn test_tick_boundary_and_appearances() {
        let mut r = reconstructor();
        let first = r.apply(&decode("5 P 1").unwrap().unwrap());
        assert_eq!(first[0], Notification::Tick { tick: Tick(5) });
        let same_tick = r.apply(&decode("5 T 2").unwrap().unwrap());
        assert_eq!(same_tick.len(), 1);

        let next = r.apply(&decode("6 P 3").unwrap().unwrap());
        assert_eq!(
            next,
            vec![
                Notification::CustomersAppeared {
                    tick: Tick(6),
                    customers: vec![CustomerAppearance::new(CustomerId(20), NodeId(99))],
                },
                Notification::Tick { tick: Tick(6) },
                Notification::CustomersPickedUp {
                    customer_ids: vec![CustomerId(3)]
                },
            ]
        );
        assert_eq!(r.last_tick(), Some(Tick(6)));
    }

    #[test]
    fn test_tick_regression_warns() {
        let mut r = reconstructor();
        feed(&mut r, "9 P 1");
        let out = r.apply(&decode("8 P 2").unwrap().unwrap());
        assert_eq!(out[0], Notification::Tick { tick: Tick(8) });
        assert_eq!(
            r.drain_warnings(),
            vec![InvariantWarning::TickRegressed {
                previous: Tick(9),
                current: Tick(8)
            }]
        );
    }

    #[test]
    fn test_load_changes() {
        let mut r = reconstructor();
        let out = feed(&mut r, "3 L 1 1 2");
        assert_eq!(out.len(), 3);
        assert_eq!(r.vehicle(VehicleId(1)).unwrap().load, 2);
        assert_eq!(r.vehicle(VehicleId(2)).unwrap().load, 1);
        assert!(r.drain_warnings().is_empty());

        let out = feed(&mut r, "4 L -2 -2");
        assert_eq!(
            out,
            vec![
                Notification::LoadChanged {
                    vehicle_id: VehicleId(2),
                    delta: -1
                },
                Notification::LoadChanged {
                    vehicle_id: VehicleId(2),
                    delta: -1
                },
            ]
        );
        assert_eq!(r.vehicle(VehicleId(2)).unwrap().load, -1);
        assert_eq!(
            r.drain_warnings(),
            vec![InvariantWarning::NegativeLoad {
                vehicle_id: VehicleId(2),
                load: -1
            }]
        );
    }

    #[test]
    fn test_matches_have_no_duplicates() {
        let mut r = reconstructor();
        let out = feed(&mut r, "3 M 1 20 21 20");
        assert_eq!(out.len(), 2);
        let state = r.vehicle(VehicleId(1)).unwrap();
        assert_eq!(
            state.matched_customers.iter().copied().collect::<Vec<_>>(),
            vec![CustomerId(20), CustomerId(21)]
        );
        assert_eq!(r.assigned_vehicle(CustomerId(21)), Some(VehicleId(1)));

        let out = feed(&mut r, "4 M 1 -20");
        assert_eq!(
            out,
            vec![Notification::Unmatched {
                vehicle_id: VehicleId(1),
                customer_id: CustomerId(20)
            }]
        );
        assert_eq!(r.assigned_vehicle(CustomerId(20)), None);
        assert!(r.drain_warnings().is_empty());
    }

    #[test]
    fn test_unmatch_unknown_customer_warns() {
        let mut r = reconstructor();
        let out = feed(&mut r, "3 M 1 -30");
        assert_eq!(out.len(), 1);
        assert_eq!(
            r.drain_warnings(),
            vec![InvariantWarning::UnmatchedUnknownCustomer {
                vehicle_id: VehicleId(1),
                customer_id: CustomerId(30)
            }]
        );
    }

    #[test]
    fn test_reassignment_warns() {
        let mut r = reconstructor();
        feed(&mut r, "3 M 1 30");
        feed(&mut r, "3 M 2 30");
        assert_eq!(r.assigned_vehicle(CustomerId(30)), Some(VehicleId(2)));
        assert_eq!(r.drain_warnings().len(), 1);
    }

    #[test]
    fn test_reset_forgets_routes() {
        let mut r = reconstructor();
        feed(&mut r, "5 R 1 10 11 12");
        r.reset();
        assert!(r.vehicle(VehicleId(1)).is_none());
        assert_eq!(r.last_tick(), None);
        let out = feed(&mut r, "1 R 1 10 11 12");
        assert!(matches!(out[0], Notification::RouteBegun { .. }));
    }
}
