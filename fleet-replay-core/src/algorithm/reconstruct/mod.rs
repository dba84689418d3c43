mod invariant_warning;
mod leg_timing;
mod notification;
mod state_reconstructor;
mod vehicle_state;

pub use invariant_warning::InvariantWarning;
pub use leg_timing::LegTiming;
pub use notification::{Notification, VehiclePosition};
pub use state_reconstructor::StateReconstructor;
pub use vehicle_state::VehicleState;
