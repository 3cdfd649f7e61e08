//! # Routed messages and their priority levels.
//!
//! [`Message`] is the unit of work on the bus: who sent it, who should
//! receive it, a verb describing the operation, and a JSON-object payload.
//! [`Priority`] decides dispatch order; equal priorities dispatch FIFO.
//!
//! ## Rules
//! - `payload` is always a JSON object. `null` coerces to the empty map;
//!   any other non-object value is a construction error.
//! - `sender` and `recipient` are non-empty. The reserved recipient
//!   [`BROADCAST`] (`"ALL"`) addresses every registered station and
//!   subscriber.
//! - `action` is an opaque string to the bus; see
//!   [`Action`](crate::Action) for the conventional vocabulary.
//!
//! ## Example
//! ```rust
//! use brigade::{Message, Priority};
//! use serde_json::json;
//!
//! let msg = Message::new("tui", "planner", "new_ticket")
//!     .unwrap()
//!     .with_payload(json!({"request": "add a README"}))
//!     .unwrap()
//!     .with_priority(Priority::High);
//!
//! assert_eq!(msg.priority.rank(), 1);
//! assert_eq!(msg.payload["request"], "add a README");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MessageError;

/// Reserved recipient meaning "deliver to every registered station and subscriber".
pub const BROADCAST: &str = "ALL";

/// Dispatch priority of a [`Message`].
///
/// Numeric ranks are part of the public contract: `CRITICAL=0`, `HIGH=1`,
/// `NORMAL=2`, `LOW=3`. Lower rank is served first; the derived `Ord`
/// follows rank order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Served before everything else (cancellations, shutdown notices).
    Critical = 0,
    /// User-visible progress and control flow.
    High = 1,
    /// Regular work items.
    #[default]
    Normal = 2,
    /// Deferred/bulk traffic.
    Low = 3,
}

impl Priority {
    /// Numeric rank (lower is served first).
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Priority::rank`]; `None` for out-of-range values.
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Priority::Critical),
            1 => Some(Priority::High),
            2 => Some(Priority::Normal),
            3 => Some(Priority::Low),
            _ => None,
        }
    }
}

/// A routed message: sender, recipient, action verb, JSON-object payload,
/// and dispatch priority.
///
/// Created by a producer at the moment of publication and treated as
/// immutable afterwards; recipients of a broadcast receive clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Station name or external id (e.g. `"tui"`) of the origin.
    pub sender: String,
    /// Target station name, or [`BROADCAST`].
    pub recipient: String,
    /// Verb identifying the semantic operation; matched by exact string.
    pub action: String,
    /// Structured payload; always a JSON object, never null.
    #[serde(default)]
    pub payload: Map<String, Value>,
    /// Dispatch priority; defaults to [`Priority::Normal`].
    #[serde(default)]
    pub priority: Priority,
}

impl Message {
    /// Creates a message with an empty payload and [`Priority::Normal`].
    ///
    /// Rejects empty `sender`/`recipient` with
    /// [`MessageError::EmptyAddress`]. The `action` string is not
    /// validated; it is opaque to the bus.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<Self, MessageError> {
        let sender = sender.into();
        if sender.is_empty() {
            return Err(MessageError::EmptyAddress { field: "sender" });
        }
        let recipient = recipient.into();
        if recipient.is_empty() {
            return Err(MessageError::EmptyAddress { field: "recipient" });
        }
        Ok(Self {
            sender,
            recipient,
            action: action.into(),
            payload: Map::new(),
            priority: Priority::default(),
        })
    }

    /// Attaches a payload.
    ///
    /// `Value::Null` coerces to the empty map; any other non-object value
    /// is rejected with [`MessageError::InvalidPayload`].
    pub fn with_payload(mut self, payload: Value) -> Result<Self, MessageError> {
        self.payload = match payload {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(MessageError::InvalidPayload {
                    kind: json_kind(&other),
                })
            }
        };
        Ok(self)
    }

    /// Sets the dispatch priority.
    #[inline]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// True if the recipient is the [`BROADCAST`] sentinel.
    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.recipient == BROADCAST
    }
}

/// JSON type name for error reporting.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_payload_coerces_to_empty_map() {
        let msg = Message::new("a", "b", "act")
            .unwrap()
            .with_payload(Value::Null)
            .unwrap();
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = Message::new("a", "b", "act")
            .unwrap()
            .with_payload(json!("just a string"))
            .unwrap_err();
        assert_eq!(err.as_label(), "invalid_payload");

        let err = Message::new("a", "b", "act")
            .unwrap()
            .with_payload(json!([1, 2, 3]))
            .unwrap_err();
        assert_eq!(err.as_label(), "invalid_payload");
    }

    #[test]
    fn empty_addresses_are_rejected() {
        assert!(matches!(
            Message::new("", "b", "act"),
            Err(MessageError::EmptyAddress { field: "sender" })
        ));
        assert!(matches!(
            Message::new("a", "", "act"),
            Err(MessageError::EmptyAddress { field: "recipient" })
        ));
    }

    #[test]
    fn priority_ranks_are_stable() {
        assert_eq!(Priority::Critical.rank(), 0);
        assert_eq!(Priority::High.rank(), 1);
        assert_eq!(Priority::Normal.rank(), 2);
        assert_eq!(Priority::Low.rank(), 3);
        assert!(Priority::Critical < Priority::Low);
        assert_eq!(Priority::from_rank(1), Some(Priority::High));
        assert_eq!(Priority::from_rank(7), None);
    }

    #[test]
    fn broadcast_sentinel_is_detected() {
        let msg = Message::new("a", BROADCAST, "act").unwrap();
        assert!(msg.is_broadcast());
        let msg = Message::new("a", "all", "act").unwrap();
        assert!(!msg.is_broadcast(), "broadcast sentinel is case-sensitive");
    }

    #[test]
    fn defaults_fill_in_on_deserialize() {
        let msg: Message =
            serde_json::from_str(r#"{"sender":"a","recipient":"b","action":"act"}"#).unwrap();
        assert!(msg.payload.is_empty());
        assert_eq!(msg.priority, Priority::Normal);
    }
}
