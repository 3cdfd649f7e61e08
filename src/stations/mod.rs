//! Stations: the actor trait, its runtime wrapper, and the send handle.
//!
//! ## Architecture
//! ```text
//! Message flow per station:
//!   Bus dispatch ── try_send ──► [bounded inbox] ─► worker loop ─► Station::handle()
//!                    (drop+warn                         │
//!                     on overflow)                      └─► Outbox::send() ─► Bus::publish()
//! ```
//!
//! A station implements [`Station`]; a [`StationActor`] gives it an inbox
//! and a worker; an [`Outbox`] lets its handler publish replies under its
//! own name.

mod actor;
mod outbox;
mod station;

#[cfg(feature = "logging")]
mod log;

pub use actor::StationActor;
pub use outbox::Outbox;
pub use station::Station;

#[cfg(feature = "logging")]
pub use log::LogStation;
