use super::{CustomerAppearance, CustomerAppearanceSchedule, InstanceError};
use crate::model::network::{CustomerId, NodeId, Tick, VehicleId};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// lines preceding the first trip row: name, road network, vehicle count,
/// customer count, a blank line and the column header.
const HEADER_LINES: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSpec {
    pub origin: NodeId,
    pub destination: NodeId,
    pub capacity: i64,
    pub early: u64,
    pub late: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerSpec {
    pub origin: NodeId,
    pub destination: NodeId,
    pub load: i64,
    pub early: u64,
    pub late: i64,
}

/// the vehicle and customer rosters of a simulation run.
///
/// trips with a positive load are customers; the rest are vehicles whose
/// capacity is the magnitude of the load column.
#[derive(Debug, Clone, Default)]
pub struct ProblemInstance {
    pub name: String,
    pub road_network: String,
    pub vehicles: HashMap<VehicleId, VehicleSpec>,
    pub customers: HashMap<CustomerId, CustomerSpec>,
    pub schedule: CustomerAppearanceSchedule,
}

impl ProblemInstance {
    pub fn from_file(path: &Path) -> Result<Self, InstanceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| InstanceError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        let instance = Self::parse(&contents)?;
        log::debug!(
            "loaded problem instance '{}' with {} vehicles and {} customers",
            instance.name,
            instance.vehicles.len(),
            instance.customers.len()
        );
        Ok(instance)
    }

    pub fn parse(contents: &str) -> Result<Self, InstanceError> {
        let mut instance = ProblemInstance::default();
        let mut lines = contents.lines();
        instance.name = lines.next().unwrap_or_default().trim().to_string();
        instance.road_network = lines.next().unwrap_or_default().trim().to_string();

        for (idx, line) in contents.lines().enumerate().skip(HEADER_LINES) {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.is_empty() {
                continue;
            }
            if cols.len() < 6 {
                return Err(InstanceError::ParseError {
                    line: idx + 1,
                    message: format!("expected 6 columns, found {}", cols.len()),
                });
            }
            let int = |col: usize| -> Result<i64, InstanceError> {
                cols[col].parse::<i64>().map_err(|e| InstanceError::ParseError {
                    line: idx + 1,
                    message: format!("column {} ('{}'): {e}", col + 1, cols[col]),
                })
            };
            let id = int(0)?;
            let origin = NodeId(int(1)?);
            let destination = NodeId(int(2)?);
            let load = int(3)?;
            let early = int(4)?;
            let late = int(5)?;
            if id < 0 || early < 0 {
                return Err(InstanceError::ParseError {
                    line: idx + 1,
                    message: String::from("trip id and early time must be non-negative"),
                });
            }

            if load > 0 {
                let customer_id = CustomerId(id as u64);
                instance.schedule.insert(
                    Tick(early as u64),
                    CustomerAppearance::new(customer_id, origin),
                );
                instance.customers.insert(
                    customer_id,
                    CustomerSpec {
                        origin,
                        destination,
                        load,
                        early: early as u64,
                        late,
                    },
                );
            } else {
                instance.vehicles.insert(
                    VehicleId(id as u64),
                    VehicleSpec {
                        origin,
                        destination,
                        capacity: load.abs(),
                        early: early as u64,
                        late,
                    },
                );
            }
        }
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCE: &str = "rs-bj5-m5k-c3-d6-s10-x1.0\n\
                            bj5\n\
                            VEHICLES 2\n\
                            CUSTOMERS 3\n\
                            \n\
                            ID\tORIGIN\tDEST\tQ\tEARLY\tLATE\n\
                            1\t10\t20\t-3\t0\t-1\n\
                            2\t11\t21\t-3\t0\t-1\n\
                            3\t12\t22\t1\t4\t600\n\
                            4\t13\t23\t1\t4\t620\n\
                            5\t14\t24\t2\t9\t700\n";

    #[test]
    fn test_parse_rosters() {
        let instance = ProblemInstance::parse(INSTANCE).unwrap();
        assert_eq!(instance.name, "rs-bj5-m5k-c3-d6-s10-x1.0");
        assert_eq!(instance.road_network, "bj5");
        assert_eq!(instance.vehicles.len(), 2);
        assert_eq!(instance.customers.len(), 3);
        assert_eq!(instance.vehicles[&VehicleId(1)].capacity, 3);
        assert_eq!(instance.customers[&CustomerId(5)].load, 2);
    }

    #[test]
    fn test_parse_schedule() {
        let instance = ProblemInstance::parse(INSTANCE).unwrap();
        let at_four = instance.schedule.lookup(Tick(4)).unwrap();
        assert_eq!(
            at_four,
            &[
                CustomerAppearance::new(CustomerId(3), NodeId(12)),
                CustomerAppearance::new(CustomerId(4), NodeId(13)),
            ]
        );
        assert!(instance.schedule.lookup(Tick(0)).is_none());
    }

    #[test]
    fn test_parse_bad_column() {
        let bad = INSTANCE.replace("5\t14\t24", "5\tx\t24");
        let result = ProblemInstance::parse(&bad);
        assert!(matches!(result, Err(InstanceError::ParseError { line: 11, .. })));
    }
}
