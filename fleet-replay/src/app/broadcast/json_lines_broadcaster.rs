use super::{BroadcastError, Broadcaster};
use chrono::Local;
use fleet_replay_core::algorithm::reconstruct::Notification;
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::Mutex;

/// writes each notification as one JSON object per line:
/// `{"event": "<name>", "emitted_at": "<rfc3339>", ...payload}`.
/// the writer is flushed after every line so followers of the output see
/// notifications as they happen.
pub struct JsonLinesBroadcaster<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesBroadcaster<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// the serialized notification with `emitted_at` placed right after the
/// `event` name
fn to_json_line(notification: &Notification) -> Result<String, BroadcastError> {
    let to_error = |e: serde_json::Error| BroadcastError::Serialization {
        event: notification.name(),
        message: e.to_string(),
    };
    let payload = match serde_json::to_value(notification).map_err(to_error)? {
        Value::Object(map) => map,
        other => {
            return Err(BroadcastError::Serialization {
                event: notification.name(),
                message: format!("expected a JSON object, found {other}"),
            })
        }
    };
    let mut line = Map::with_capacity(payload.len() + 1);
    line.insert("event".to_string(), Value::from(notification.name()));
    line.insert(
        "emitted_at".to_string(),
        Value::from(Local::now().to_rfc3339()),
    );
    line.extend(payload.into_iter().filter(|(key, _)| key != "event"));
    serde_json::to_string(&line).map_err(to_error)
}

impl<W: Write> Broadcaster for JsonLinesBroadcaster<W> {
    fn broadcast(&self, notification: &Notification) -> Result<(), BroadcastError> {
        let line = to_json_line(notification)?;
        let mut writer = self.writer.lock().map_err(|_| BroadcastError::Poisoned)?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
