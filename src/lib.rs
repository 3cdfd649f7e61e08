//! # brigade
//!
//! **Brigade** is a lightweight in-process message bus for coordinating a
//! small crew of cooperating actors ("stations") inside an application.
//!
//! Stations never call each other directly: they publish a [`Message`] and
//! the bus routes it by recipient name, or broadcasts it to everyone. The
//! crate provides the priority-ordered queue, the station worker runtime,
//! and the startup/shutdown orchestration; station behavior is yours.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Station    │   │   Station    │   │   Station    │
//!     │  ("planner") │   │  ("builder") │   │  ("tester")  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ Outbox::send     │                  │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus                                                              │
//! │  - priority queue, ordered by (priority rank, insertion seq)      │
//! │  - single dispatch worker                                         │
//! │  - registry: station inboxes + raw subscriber callbacks           │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               ▼
//!   [inbox planner]    [inbox builder]    [inbox tester]  callbacks("tui")
//!        │                  │                  │
//!   worker loop        worker loop        worker loop
//!        │                  │                  │
//!   handle() one       handle() one       handle() one
//!   message at a time  message at a time  message at a time
//! ```
//!
//! ### Lifecycle
//! ```text
//! Brigade::open()   ─► bus.start() ─► stations start in registration order
//! Brigade::close()  ─► stations stop in reverse order ─► bus.stop() last
//! Brigade::wait_idle() ─► suspends until the central queue has drained
//! ```
//!
//! ## Guarantees and trade-offs
//! - **Global priority order**: dispatch strictly by `(rank, seq)`;
//!   equal priorities are FIFO (per-recipient order is priority order,
//!   not publish order, across different priorities).
//! - **Per-station serialization**: one `handle()` at a time per station;
//!   different stations run concurrently.
//! - **Best-effort delivery**: bounded inboxes drop on overflow (with a
//!   warning); unknown recipients drop silently. No persistence, no
//!   cross-process distribution, no backpressure to publishers.
//! - **Isolation**: a failing or panicking handler/callback is logged and
//!   contained; the bus and other stations keep running.
//!
//! ## Features
//! | Area           | Description                                            | Key types / traits        |
//! |----------------|--------------------------------------------------------|---------------------------|
//! | **Messages**   | Routed record with JSON payload and priority.          | [`Message`], [`Priority`] |
//! | **Actions**    | Conventional verb vocabulary for exhaustive matching.  | [`Action`]                |
//! | **Bus**        | Publish, route by name or broadcast, subscribe raw.    | [`Bus`]                   |
//! | **Stations**   | Actor trait, inbox worker runtime, send handle.        | [`Station`], [`StationActor`], [`Outbox`] |
//! | **Lifecycle**  | Ordered startup/shutdown, drain wait.                  | [`Brigade`]               |
//! | **Errors**     | Typed errors per failure domain.                       | [`MessageError`], [`StationError`], [`BrigadeError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogStation`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use brigade::{Brigade, Message, Outbox, Priority, Station, StationError};
//!
//! /// Replies to every ticket with a status update for the UI listener.
//! struct Echo {
//!     outbox: Outbox,
//! }
//!
//! #[async_trait::async_trait]
//! impl Station for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn handle(&self, message: Message) -> Result<(), StationError> {
//!         self.outbox
//!             .send(
//!                 "tui",
//!                 "STATUS_UPDATE",
//!                 Some(serde_json::json!({"echoed": message.action})),
//!                 Priority::High,
//!             )
//!             .map_err(|e| StationError::handler(e.to_string()))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut brigade = Brigade::new();
//!     let outbox = Outbox::new("echo", brigade.bus().clone());
//!     brigade.register(Arc::new(Echo { outbox }))?;
//!
//!     // A UI layer can listen without being a full station.
//!     brigade.bus().subscribe_sync("tui", |message| {
//!         let _ = message; // render it
//!     });
//!
//!     brigade.open().await?;
//!     brigade.bus().publish(Message::new("tui", "echo", "new_ticket")?);
//!     brigade.wait_idle().await;
//!     brigade.close().await;
//!     Ok(())
//! }
//! ```

mod brigade;
mod bus;
mod config;
mod error;
mod messages;
mod stations;

// ---- Public re-exports ----

pub use brigade::Brigade;
pub use bus::Bus;
pub use config::Config;
pub use error::{BrigadeError, MessageError, StationError};
pub use messages::{Action, Message, Priority, BROADCAST};
pub use stations::{Outbox, Station, StationActor};

// Optional: expose a simple built-in logging station (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use stations::LogStation;
