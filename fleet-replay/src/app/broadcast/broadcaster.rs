use super::BroadcastError;
use fleet_replay_core::algorithm::reconstruct::Notification;

/// fans reconstructed state changes out to viewers. implementations decide
/// the transport; the session only promises to call `broadcast` once per
/// notification, in the order the notifications were produced.
pub trait Broadcaster {
    fn broadcast(&self, notification: &Notification) -> Result<(), BroadcastError>;
}

impl<B: Broadcaster + ?Sized> Broadcaster for Box<B> {
    fn broadcast(&self, notification: &Notification) -> Result<(), BroadcastError> {
        (**self).broadcast(notification)
    }
}
