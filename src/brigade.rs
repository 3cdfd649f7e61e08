//! # Brigade: lifecycle orchestration for a bus and its stations.
//!
//! The [`Brigade`] owns exactly one [`Bus`] (created at construction) and
//! the registered [`StationActor`]s in insertion order. It coordinates
//! startup and shutdown as a unit.
//!
//! ## Ordering
//! ```text
//! open():   bus.start() ─► station[0].start() ─► station[1].start() ─► ...
//!           (first on_start error propagates; earlier stations stay
//!            started — recover with close())
//!
//! close():  ... ─► station[1].stop() ─► station[0].stop() ─► bus.stop()
//!           (reverse registration order; the bus stops last so final
//!            messages from a stopping station still have a live bus)
//! ```
//!
//! Messages routed to an already-stopped station during shutdown fall
//! under the no-recipient/overflow drop rules; that is the documented
//! best-effort trade-off, not an error.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use brigade::{Brigade, Message, Station, StationError};
//!
//! struct Planner;
//!
//! #[async_trait::async_trait]
//! impl Station for Planner {
//!     fn name(&self) -> &str {
//!         "planner"
//!     }
//!     async fn handle(&self, _message: Message) -> Result<(), StationError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut brigade = Brigade::new();
//!     brigade.register(Arc::new(Planner))?;
//!     brigade.open().await?;
//!
//!     brigade.bus().publish(Message::new("tui", "planner", "new_ticket")?);
//!     brigade.wait_idle().await;
//!
//!     brigade.close().await;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use crate::bus::Bus;
use crate::config::Config;
use crate::error::BrigadeError;
use crate::stations::{Station, StationActor};

/// Owns one bus and a set of stations; coordinates their lifecycle.
///
/// Each brigade is fully independent — no process-wide state — so several
/// can coexist in one process (useful for tests).
pub struct Brigade {
    bus: Bus,
    stations: Vec<StationActor>,
    config: Config,
    running: bool,
}

impl Brigade {
    /// Creates a brigade with default [`Config`] and a fresh bus.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a brigade with the given runtime defaults.
    pub fn with_config(config: Config) -> Self {
        Self {
            bus: Bus::new(),
            stations: Vec::new(),
            config,
            running: false,
        }
    }

    /// The brigade's bus, for publishing and for wiring station outboxes.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Registers a station. Start order is registration order.
    ///
    /// Duplicate names are rejected with
    /// [`BrigadeError::DuplicateStation`]; there is no silent hot-swap.
    pub fn register(&mut self, station: Arc<dyn Station>) -> Result<(), BrigadeError> {
        let name = station.name();
        if self.stations.iter().any(|actor| actor.name() == name) {
            return Err(BrigadeError::DuplicateStation {
                station: name.to_string(),
            });
        }
        self.stations
            .push(StationActor::new(station, self.bus.clone(), &self.config));
        Ok(())
    }

    /// Looks up a registered station's actor by name.
    pub fn get_station(&self, name: &str) -> Option<&StationActor> {
        self.stations.iter().find(|actor| actor.name() == name)
    }

    /// Starts the bus, then every station in registration order.
    ///
    /// The first station failure propagates; the bus and previously
    /// started stations remain running (no rollback — call
    /// [`Brigade::close`] to unwind a partial start).
    pub async fn open(&mut self) -> Result<(), BrigadeError> {
        self.bus.start().await;
        for actor in &mut self.stations {
            let station = actor.name().to_string();
            actor
                .start()
                .await
                .map_err(|source| BrigadeError::StationStart { station, source })?;
        }
        self.running = true;
        Ok(())
    }

    /// Stops stations in reverse registration order, then the bus last.
    /// Idempotent; safe after a failed [`Brigade::open`].
    pub async fn close(&mut self) {
        self.running = false;
        for actor in self.stations.iter_mut().rev() {
            actor.stop().await;
        }
        self.bus.stop().await;
    }

    /// Suspends until the bus has dispatched everything queued so far.
    ///
    /// Does not guard against concurrent publishes; stop producers first
    /// for a precise quiescence point.
    pub async fn wait_idle(&self) {
        self.bus.join().await;
    }

    /// True between a successful [`Brigade::open`] and [`Brigade::close`].
    pub fn is_open(&self) -> bool {
        self.running
    }

    /// Registered station names, in registration order.
    pub fn station_names(&self) -> Vec<String> {
        self.stations
            .iter()
            .map(|actor| actor.name().to_string())
            .collect()
    }

    /// Number of registered stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

impl Default for Brigade {
    fn default() -> Self {
        Self::new()
    }
}
