mod broadcast_error;
mod broadcaster;
mod channel_broadcaster;
mod json_lines_broadcaster;

pub use broadcast_error::BroadcastError;
pub use broadcaster::Broadcaster;
pub use channel_broadcaster::ChannelBroadcaster;
pub use json_lines_broadcaster::JsonLinesBroadcaster;
