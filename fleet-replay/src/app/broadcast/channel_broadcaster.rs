use super::{BroadcastError, Broadcaster};
use fleet_replay_core::algorithm::reconstruct::Notification;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// in-process publish/subscribe. every subscriber receives every
/// notification broadcast after it subscribed; subscribers whose receiver
/// was dropped are forgotten on the next broadcast.
#[derive(Debug, Default)]
pub struct ChannelBroadcaster {
    subscribers: Mutex<Vec<Sender<Notification>>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        let (tx, rx) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(subscribers) => subscribers.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn broadcast(&self, notification: &Notification) -> Result<(), BroadcastError> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| BroadcastError::Poisoned)?;
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(notification.clone()).is_ok());
        if subscribers.len() < before {
            log::debug!(
                "dropped {} disconnected subscribers",
                before - subscribers.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_replay_core::model::network::Tick;

    #[test]
    fn test_every_subscriber_receives() {
        let broadcaster = ChannelBroadcaster::new();
        let a = broadcaster.subscribe();
        let b = broadcaster.subscribe();
        let n = Notification::Tick { tick: Tick(3) };
        broadcaster.broadcast(&n).unwrap();
        assert_eq!(a.try_recv().unwrap(), n);
        assert_eq!(b.try_recv().unwrap(), n);
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let broadcaster = ChannelBroadcaster::new();
        let kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        drop(dropped);
        assert_eq!(broadcaster.subscriber_count(), 2);

        broadcaster
            .broadcast(&Notification::Tick { tick: Tick(1) })
            .unwrap();
        assert_eq!(broadcaster.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }
}
