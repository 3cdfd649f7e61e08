//! # The central dispatcher.
//!
//! [`Bus`] accepts published [`Message`]s into a single priority queue and
//! routes them from one dispatch worker to station inboxes and raw
//! subscriber callbacks, by recipient name or [`BROADCAST`].
//!
//! ## Architecture
//! ```text
//! Producers (many):                        Recipients:
//!   Station A ──┐
//!   Station B ──┼─ publish() ─► [priority queue] ─► dispatch loop
//!   UI layer  ──┘                                       │
//!                                       ┌───────────────┼────────────────┐
//!                                       ▼               ▼                ▼
//!                                 [inbox "a"]     [inbox "b"]    callbacks("tui")
//!                                 (bounded,       (bounded,      (async or sync,
//!                                  drop+warn)      drop+warn)     catch-unwind)
//! ```
//!
//! ## Rules
//! - **Non-suspending publish**: `publish()` is a pure in-memory enqueue
//!   and always succeeds; the central queue is unbounded.
//! - **Retain until restart**: a stopped (or never-started) bus keeps
//!   accepting messages; they queue up and dispatch on the next `start()`.
//!   `stop()` never discards the queue.
//! - **Global priority order**: one worker pops strictly by
//!   `(priority rank, insertion sequence)`.
//! - **Fire-and-forget routing**: a non-broadcast recipient with no inbox
//!   and no callback drops the message silently (stations that have not
//!   started yet are valid addressees).
//! - **Isolation**: a panicking callback is caught and logged; it never
//!   stops the dispatch loop or starves other recipients of the same
//!   message. Inbox overflow drops with a warning naming the station.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::queue::PriorityQueue;
use crate::messages::Message;

/// Normalized subscriber callback: sync and async registrations both
/// funnel into this boxed-future shape.
type Callback = Arc<dyn Fn(Message) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Delivery target registered by a running station actor.
#[derive(Clone)]
struct Inbox {
    station: String,
    sender: mpsc::Sender<Message>,
    /// Shared with the owning actor for overflow observability.
    dropped: Arc<AtomicU64>,
}

#[derive(Default)]
struct Registry {
    inboxes: HashMap<String, Inbox>,
    callbacks: HashMap<String, Vec<Callback>>,
}

struct Worker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct Shared {
    queue: PriorityQueue,
    registry: RwLock<Registry>,
    worker: Mutex<Option<Worker>>,
    running: AtomicBool,
}

/// Central dispatcher routing published messages to stations and
/// subscribers.
///
/// Cheap to clone (internally `Arc`-backed); every clone publishes into
/// the same queue. Each [`Brigade`](crate::Brigade) owns an independent
/// bus, so multiple brigades can coexist in one process.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

impl Bus {
    /// Creates a new, inert bus (empty queue, empty registry, stopped).
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: PriorityQueue::new(),
                registry: RwLock::new(Registry::default()),
                worker: Mutex::new(None),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// Enqueues a message for dispatch. Never suspends, never fails.
    ///
    /// May be called whether or not the bus is running: messages published
    /// to a stopped bus are retained and dispatched after the next
    /// [`Bus::start`].
    pub fn publish(&self, message: Message) {
        trace!(
            sender = %message.sender,
            recipient = %message.recipient,
            action = %message.action,
            "message published"
        );
        self.shared.queue.push(message);
    }

    /// Starts the single dispatch loop. Idempotent.
    pub async fn start(&self) {
        let mut slot = self.shared.worker.lock().await;
        if slot.is_some() {
            return;
        }
        let token = CancellationToken::new();
        let bus = self.clone();
        let child = token.clone();
        let handle = tokio::spawn(async move { bus.dispatch_loop(child).await });
        *slot = Some(Worker { token, handle });
        self.shared.running.store(true, Ordering::SeqCst);
        debug!("bus dispatch loop started");
    }

    /// Stops the dispatch loop. Idempotent.
    ///
    /// An in-flight dispatch step finishes; no new pops occur afterwards.
    /// Queued messages are retained for a later [`Bus::start`].
    pub async fn stop(&self) {
        let worker = self.shared.worker.lock().await.take();
        let Some(worker) = worker else {
            return;
        };
        self.shared.running.store(false, Ordering::SeqCst);
        worker.token.cancel();
        let _ = worker.handle.await;
        debug!("bus dispatch loop stopped");
    }

    /// True while the dispatch loop is running.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Number of messages enqueued but not yet fully dispatched.
    pub fn pending(&self) -> usize {
        self.shared.queue.outstanding()
    }

    /// Suspends until every message enqueued so far has been dispatched.
    ///
    /// Does not guard against concurrent publishes; stop producers first
    /// if a precise quiescence point is needed. With a stopped bus and a
    /// non-empty queue this waits until the bus is started again.
    pub async fn join(&self) {
        self.shared.queue.join().await;
    }

    /// Registers an async callback invoked for every message dispatched to
    /// `station`. Multiple callbacks per name are additive.
    ///
    /// Intended for lightweight listeners that are not full stations
    /// (e.g. a UI layer tailing its own name or observing broadcasts).
    pub fn subscribe<F, Fut>(&self, station: impl Into<String>, callback: F)
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let wrapped: Callback = Arc::new(move |message| Box::pin(callback(message)));
        self.shared
            .registry
            .write()
            .callbacks
            .entry(station.into())
            .or_default()
            .push(wrapped);
    }

    /// Registers a synchronous callback; same contract as [`Bus::subscribe`].
    ///
    /// The callback runs inline in the dispatch loop, so it must not block.
    pub fn subscribe_sync<F>(&self, station: impl Into<String>, callback: F)
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let wrapped: Callback = Arc::new(move |message| {
            let callback = Arc::clone(&callback);
            // Defer the call into the future so a panicking callback is
            // caught by the same isolation wrapper as async ones.
            Box::pin(async move { callback(message) })
        });
        self.shared
            .registry
            .write()
            .callbacks
            .entry(station.into())
            .or_default()
            .push(wrapped);
    }

    /// Removes all callbacks registered under `station`.
    pub fn unsubscribe(&self, station: &str) {
        self.shared.registry.write().callbacks.remove(station);
    }

    /// Registers a station inbox as a delivery target. Called by
    /// [`StationActor::start`](crate::StationActor::start).
    pub(crate) fn register_inbox(
        &self,
        station: impl Into<String>,
        sender: mpsc::Sender<Message>,
        dropped: Arc<AtomicU64>,
    ) {
        let station = station.into();
        let inbox = Inbox {
            station: station.clone(),
            sender,
            dropped,
        };
        self.shared.registry.write().inboxes.insert(station, inbox);
    }

    /// Removes a station inbox. Called by
    /// [`StationActor::stop`](crate::StationActor::stop).
    pub(crate) fn deregister_inbox(&self, station: &str) {
        self.shared.registry.write().inboxes.remove(station);
    }

    /// Single dispatch worker: pop by priority, route, account.
    async fn dispatch_loop(&self, token: CancellationToken) {
        loop {
            let envelope = tokio::select! {
                _ = token.cancelled() => break,
                envelope = self.shared.queue.pop() => envelope,
            };
            self.deliver(envelope.message).await;
            self.shared.queue.task_done();
        }
    }

    /// Routes one message to its inboxes and callbacks.
    async fn deliver(&self, message: Message) {
        let (inboxes, callbacks) = self.targets_for(&message);

        if inboxes.is_empty() && callbacks.is_empty() {
            debug!(
                recipient = %message.recipient,
                action = %message.action,
                "no recipient registered; message dropped"
            );
            return;
        }

        for inbox in inboxes {
            match inbox.sender.try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    inbox.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        station = %inbox.station,
                        action = %message.action,
                        "inbox full; message dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    inbox.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        station = %inbox.station,
                        action = %message.action,
                        "inbox closed; message dropped"
                    );
                }
            }
        }

        for (name, callback) in callbacks {
            // Guard both future construction and its execution; either can
            // unwind out of arbitrary user code.
            let created =
                std::panic::catch_unwind(AssertUnwindSafe(|| callback(message.clone())));
            let panicked = match created {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await.is_err(),
                Err(_) => true,
            };
            if panicked {
                error!(
                    subscriber = %name,
                    action = %message.action,
                    "subscriber callback panicked"
                );
            }
        }
    }

    /// Snapshots the delivery targets for a message.
    ///
    /// Clones senders/callbacks out under the registry lock so no lock is
    /// held across an await. A station registering mid-broadcast may or
    /// may not see that broadcast; registration changes during an
    /// in-flight dispatch are racy by design.
    fn targets_for(&self, message: &Message) -> (Vec<Inbox>, Vec<(String, Callback)>) {
        let registry = self.shared.registry.read();
        if message.is_broadcast() {
            let inboxes = registry.inboxes.values().cloned().collect();
            let callbacks = registry
                .callbacks
                .iter()
                .flat_map(|(name, callbacks)| {
                    callbacks
                        .iter()
                        .map(move |callback| (name.clone(), Arc::clone(callback)))
                })
                .collect();
            (inboxes, callbacks)
        } else {
            let inboxes = registry
                .inboxes
                .get(message.recipient.as_str())
                .cloned()
                .into_iter()
                .collect();
            let callbacks = registry
                .callbacks
                .get(message.recipient.as_str())
                .map(|callbacks| {
                    callbacks
                        .iter()
                        .map(|callback| (message.recipient.clone(), Arc::clone(callback)))
                        .collect()
                })
                .unwrap_or_default();
            (inboxes, callbacks)
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
