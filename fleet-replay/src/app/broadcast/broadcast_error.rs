#[derive(thiserror::Error, Debug)]
pub enum BroadcastError {
    #[error("failure serializing {event} notification: {message}")]
    Serialization { event: &'static str, message: String },
    #[error("failure writing notification: {0}")]
    Write(#[from] std::io::Error),
    #[error("broadcaster lock was poisoned by a panicking writer")]
    Poisoned,
}
