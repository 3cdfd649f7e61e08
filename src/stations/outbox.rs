//! # Outbox: the station-side send convenience.
//!
//! Stations never call each other directly; they publish. [`Outbox`] fixes
//! the sender name so a station's handler can post replies without
//! repeating itself. Construct stations around it the same way they are
//! constructed around the bus.

use serde_json::Value;

use crate::bus::Bus;
use crate::error::MessageError;
use crate::messages::{Message, Priority};

/// Publishing handle with a fixed sender name.
///
/// Cheap to clone; all clones publish into the same bus.
#[derive(Clone)]
pub struct Outbox {
    station: String,
    bus: Bus,
}

impl Outbox {
    /// Creates an outbox publishing as `station` on `bus`.
    pub fn new(station: impl Into<String>, bus: Bus) -> Self {
        Self {
            station: station.into(),
            bus,
        }
    }

    /// The fixed sender name.
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Constructs and publishes a message from this station.
    ///
    /// `payload` follows the message contract: `None`/`Null` become the
    /// empty map, non-object values are rejected. Publication itself is
    /// fire-and-forget.
    pub fn send(
        &self,
        recipient: impl Into<String>,
        action: impl Into<String>,
        payload: Option<Value>,
        priority: Priority,
    ) -> Result<(), MessageError> {
        let mut message = Message::new(self.station.clone(), recipient, action)?;
        if let Some(payload) = payload {
            message = message.with_payload(payload)?;
        }
        self.bus.publish(message.with_priority(priority));
        Ok(())
    }
}
