mod decode_error;
mod event;
mod protocol_decoder;

pub use decode_error::DecodeError;
pub use event::{Event, LoadEntry, LogEvent, MatchEntry};
pub use protocol_decoder::{decode, encode};
