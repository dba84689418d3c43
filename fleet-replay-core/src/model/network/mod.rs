mod customer_id;
mod edge_weight_table;
mod network_error;
mod node_id;
mod node_position_table;
mod tick;
mod vehicle_id;

pub use customer_id::CustomerId;
pub use edge_weight_table::EdgeWeightTable;
pub use network_error::NetworkError;
pub use node_id::NodeId;
pub use node_position_table::NodePositionTable;
pub use tick::Tick;
pub use vehicle_id::VehicleId;
