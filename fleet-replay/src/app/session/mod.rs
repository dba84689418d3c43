mod entity_info;
mod replay_context;
mod replay_session;
mod session_error;
mod session_signal;

pub use entity_info::{CustomerInfo, VehicleInfo};
pub use replay_context::ReplayContext;
pub use replay_session::{ReplaySession, SessionStats};
pub use session_error::SessionError;
pub use session_signal::SessionSignal;
