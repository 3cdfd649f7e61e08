//! # Core station trait.
//!
//! `Station` is the extension point for plugging actors into the bus. Each
//! station is driven by a dedicated worker loop fed by a bounded inbox that
//! is owned by its [`StationActor`](crate::StationActor).
//!
//! ## Contract
//! - `handle` calls are **serialized** per station (one message at a time,
//!   in inbox order). Different stations run concurrently; shared state
//!   between stations needs its own synchronization.
//! - Implementations may be slow (LLM calls, HTTP, subprocesses) — they
//!   suspend their own worker only, never the bus or other stations. A
//!   handler that never returns stalls its station; the inbox then fills
//!   and starts dropping.
//! - Errors and panics inside `handle` are caught, logged with the station
//!   name and the triggering action, and do not stop the worker loop.
//!
//! ## Example (skeleton)
//! ```rust
//! use brigade::{Message, Station, StationError};
//!
//! struct Tester;
//!
//! #[async_trait::async_trait]
//! impl Station for Tester {
//!     fn name(&self) -> &str {
//!         "tester"
//!     }
//!
//!     async fn handle(&self, message: Message) -> Result<(), StationError> {
//!         match brigade::Action::parse(&message.action) {
//!             Some(brigade::Action::Implement) => { /* run the suite */ }
//!             _ => { /* unrecognized traffic: deliberate no-op */ }
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::StationError;
use crate::messages::Message;

/// Contract for bus-driven actors.
///
/// Implementations are owned behind `Arc` by a
/// [`StationActor`](crate::StationActor); interior mutability is theirs to
/// manage (handler calls are serialized, so a `Mutex` is rarely contended).
#[async_trait]
pub trait Station: Send + Sync + 'static {
    /// Routing key; unique within a brigade.
    fn name(&self) -> &str;

    /// Processes one message. Called sequentially per station.
    async fn handle(&self, message: Message) -> Result<(), StationError>;

    /// Preferred inbox bound for this station.
    ///
    /// `None` uses the brigade's [`Config::inbox_capacity`](crate::Config::inbox_capacity).
    /// On overflow, deliveries to this station are dropped (warn).
    fn inbox_capacity(&self) -> Option<usize> {
        None
    }

    /// Runs before the worker starts; an error here aborts
    /// [`Brigade::open`](crate::Brigade::open) for the whole brigade.
    async fn on_start(&self) -> Result<(), StationError> {
        Ok(())
    }

    /// Runs after the worker has fully stopped.
    async fn on_stop(&self) {}
}
