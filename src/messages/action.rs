//! # Conventional action vocabulary.
//!
//! The bus treats [`Message::action`](crate::Message::action) as an opaque
//! string. [`Action`] enumerates the cross-cutting verbs producers and
//! consumers agree on, so a station can match exhaustively instead of
//! scattering string comparisons:
//!
//! ```rust
//! use brigade::Action;
//!
//! match Action::parse("task_complete") {
//!     Some(Action::TaskComplete) => { /* advance the ticket */ }
//!     Some(_) => { /* other recognized traffic */ }
//!     None => { /* unrecognized action: deliberate no-op */ }
//! }
//! ```
//!
//! Parsing is case-insensitive (`"new_ticket"` and `"NEW_TICKET"` are the
//! same verb); [`Action::as_str`] yields the canonical SCREAMING_SNAKE
//! form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cross-cutting actions recognized by the surrounding system.
///
/// This is a convention enforced by producers/consumers, not by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// A user request arrived.
    NewTicket,
    /// Delegate a work item to a station.
    Implement,
    /// A delegated work item finished successfully.
    TaskComplete,
    /// A delegated work item failed.
    TaskError,
    /// Abort the in-flight ticket.
    CancelTicket,
    /// Ask a station to report its status.
    StatusRequest,
    /// Progress report for the UI layer.
    StatusUpdate,
    /// Final disposition of a ticket.
    TicketDone,
    /// Free-form log line for the UI layer.
    LogMessage,
    /// Incremental output chunk (streaming generation).
    StreamUpdate,
}

impl Action {
    const ALL: [Action; 10] = [
        Action::NewTicket,
        Action::Implement,
        Action::TaskComplete,
        Action::TaskError,
        Action::CancelTicket,
        Action::StatusRequest,
        Action::StatusUpdate,
        Action::TicketDone,
        Action::LogMessage,
        Action::StreamUpdate,
    ];

    /// Canonical SCREAMING_SNAKE name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::NewTicket => "NEW_TICKET",
            Action::Implement => "IMPLEMENT",
            Action::TaskComplete => "TASK_COMPLETE",
            Action::TaskError => "TASK_ERROR",
            Action::CancelTicket => "CANCEL_TICKET",
            Action::StatusRequest => "STATUS_REQUEST",
            Action::StatusUpdate => "STATUS_UPDATE",
            Action::TicketDone => "TICKET_DONE",
            Action::LogMessage => "LOG_MESSAGE",
            Action::StreamUpdate => "STREAM_UPDATE",
        }
    }

    /// Case-insensitive lookup; `None` for unrecognized actions.
    ///
    /// Stations matching on the result should treat `None` as an explicit
    /// no-op rather than an error.
    pub fn parse(action: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(action))
            .copied()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Action::parse("new_ticket"), Some(Action::NewTicket));
        assert_eq!(Action::parse("NEW_TICKET"), Some(Action::NewTicket));
        assert_eq!(Action::parse("Status_Update"), Some(Action::StatusUpdate));
    }

    #[test]
    fn unrecognized_actions_parse_to_none() {
        assert_eq!(Action::parse("JULIENNE"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn canonical_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }
}
