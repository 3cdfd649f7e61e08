//! # StationActor: the per-station inbox worker.
//!
//! Owns one [`Station`] trait object together with its runtime state: the
//! bounded inbox, the worker task, a cancellation token, and the dropped
//! message counter shared with the bus.
//!
//! ## Lifecycle
//! ```text
//! constructed (inert)
//!   ├─ start(): on_start() ─► fresh inbox ─► register with bus ─► spawn worker
//!   │            (an Err here registers nothing and spawns nothing)
//!   ├─ stop():  deregister ─► cancel idle wait ─► join worker ─► on_stop()
//!   │            (an in-flight handle() runs to completion first)
//!   └─ start() again: permitted; reinitializes the inbox
//! ```
//!
//! ## Rules
//! - The worker processes **one message at a time**, in inbox order.
//! - Cancellation is observed only between messages; there is no forced
//!   cancellation of in-progress handler code. Stations wanting hard
//!   cancellation carry their own token.
//! - Handler errors and panics are logged and skipped; the loop continues.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::bus::Bus;
use crate::config::Config;
use crate::error::StationError;
use crate::messages::Message;
use crate::stations::station::Station;

struct Worker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runtime wrapper driving one [`Station`].
///
/// Usually owned by a [`Brigade`](crate::Brigade); construct directly to
/// run a station against a bare [`Bus`].
pub struct StationActor {
    station: Arc<dyn Station>,
    bus: Bus,
    capacity: usize,
    dropped: Arc<AtomicU64>,
    worker: Option<Worker>,
}

impl StationActor {
    /// Wraps a station for the given bus; inert until [`StationActor::start`].
    ///
    /// The inbox bound is the station's
    /// [`inbox_capacity`](Station::inbox_capacity) override, or the config
    /// default, clamped to a minimum of 1.
    pub fn new(station: Arc<dyn Station>, bus: Bus, config: &Config) -> Self {
        let capacity = station
            .inbox_capacity()
            .unwrap_or(config.inbox_capacity)
            .max(1);
        Self {
            station,
            bus,
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// The wrapped station's routing key.
    pub fn name(&self) -> &str {
        self.station.name()
    }

    /// True while the worker loop is running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Messages dropped at this station's inbox since construction
    /// (overflow or delivery to a closing inbox).
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Starts the worker: runs `on_start`, creates a fresh inbox, registers
    /// it with the bus, and spawns the loop. Idempotent.
    pub async fn start(&mut self) -> Result<(), StationError> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.station.on_start().await?;

        let (tx, rx) = mpsc::channel(self.capacity);
        self.bus
            .register_inbox(self.station.name(), tx, Arc::clone(&self.dropped));

        let token = CancellationToken::new();
        let handle = tokio::spawn(worker_loop(
            Arc::clone(&self.station),
            rx,
            token.clone(),
        ));
        self.worker = Some(Worker { token, handle });
        debug!(station = self.station.name(), "station started");
        Ok(())
    }

    /// Stops the worker: deregisters from the bus, cancels the idle wait,
    /// lets an in-flight `handle` finish, then runs `on_stop`. Idempotent.
    pub async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.bus.deregister_inbox(self.station.name());
        worker.token.cancel();
        let _ = worker.handle.await;
        self.station.on_stop().await;
        debug!(station = self.station.name(), "station stopped");
    }
}

/// Sequential inbox loop: recv, handle, isolate failures, repeat.
async fn worker_loop(
    station: Arc<dyn Station>,
    mut inbox: mpsc::Receiver<Message>,
    token: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            _ = token.cancelled() => break,
            received = inbox.recv() => match received {
                Some(message) => message,
                None => break,
            },
        };

        let action = message.action.clone();
        match AssertUnwindSafe(station.handle(message)).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(
                    station = station.name(),
                    action = %action,
                    error = %err,
                    "station handler failed"
                );
            }
            Err(_panic) => {
                error!(
                    station = station.name(),
                    action = %action,
                    "station handler panicked"
                );
            }
        }
    }
}
