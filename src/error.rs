//! Error types used by the brigade runtime and stations.
//!
//! This module defines three error enums, one per failure domain:
//!
//! - [`MessageError`] — message construction errors, surfaced synchronously
//!   to the caller of [`Message::new`](crate::Message::new) /
//!   [`Outbox::send`](crate::Outbox::send).
//! - [`StationError`] — errors raised by a station's handler or lifecycle
//!   hooks. Handler errors are caught at the point of invocation, logged
//!   with the station identity and the triggering action, and never
//!   propagate to the dispatch loop or to other recipients.
//! - [`BrigadeError`] — lifecycle orchestration errors (duplicate
//!   registration, a station refusing to start).
//!
//! All types provide `as_label` helpers for logs/metrics.

use thiserror::Error;

/// # Errors raised while constructing a [`Message`](crate::Message).
///
/// These are the only errors a publisher sees synchronously; everything
/// past construction is fire-and-forget.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MessageError {
    /// The payload was a JSON value other than an object (or `null`).
    #[error("payload must be a JSON object, got {kind}")]
    InvalidPayload {
        /// JSON type name of the rejected value (`"string"`, `"array"`, ...).
        kind: &'static str,
    },

    /// `sender` or `recipient` was an empty string.
    #[error("message {field} must be a non-empty string")]
    EmptyAddress {
        /// Which field was empty (`"sender"` or `"recipient"`).
        field: &'static str,
    },
}

impl MessageError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            MessageError::InvalidPayload { .. } => "invalid_payload",
            MessageError::EmptyAddress { .. } => "empty_address",
        }
    }
}

/// # Errors produced by a station.
///
/// Raised from [`Station::handle`](crate::Station::handle) or
/// [`Station::on_start`](crate::Station::on_start). Handler errors are
/// isolated per station; startup errors abort
/// [`Brigade::open`](crate::Brigade::open).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StationError {
    /// The handler failed while processing a message.
    #[error("handler failed: {error}")]
    Handler {
        /// The underlying error message.
        error: String,
    },

    /// The station refused to start (resource acquisition, config, ...).
    #[error("startup failed: {error}")]
    Startup {
        /// The underlying error message.
        error: String,
    },
}

impl StationError {
    /// Shorthand for [`StationError::Handler`].
    pub fn handler(error: impl Into<String>) -> Self {
        StationError::Handler {
            error: error.into(),
        }
    }

    /// Shorthand for [`StationError::Startup`].
    pub fn startup(error: impl Into<String>) -> Self {
        StationError::Startup {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StationError::Handler { .. } => "station_handler",
            StationError::Startup { .. } => "station_startup",
        }
    }
}

/// # Errors produced by the [`Brigade`](crate::Brigade) orchestrator.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BrigadeError {
    /// A station with the same name is already registered.
    ///
    /// Registration rejects duplicates instead of silently replacing the
    /// previous entry; swap stations by closing and rebuilding the brigade.
    #[error("station '{station}' is already registered")]
    DuplicateStation {
        /// The conflicting station name.
        station: String,
    },

    /// A station's `on_start` hook failed during [`Brigade::open`](crate::Brigade::open).
    ///
    /// Stations started before the failure remain started (no rollback);
    /// call [`Brigade::close`](crate::Brigade::close) to unwind.
    #[error("station '{station}' failed to start: {source}")]
    StationStart {
        /// Name of the station that refused to start.
        station: String,
        /// The underlying startup error.
        #[source]
        source: StationError,
    },
}

impl BrigadeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BrigadeError::DuplicateStation { .. } => "duplicate_station",
            BrigadeError::StationStart { .. } => "station_start",
        }
    }
}
