//! Shared station fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Semaphore};

use brigade::{Message, Station, StationError};

/// Awaits the next item with a test-friendly timeout.
pub async fn recv_timeout<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("channel closed")
}

/// Forwards every handled message to the test.
pub struct Recorder {
    name: String,
    tx: mpsc::UnboundedSender<Message>,
}

impl Recorder {
    pub fn new(name: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                name: name.into(),
                tx,
            }),
            rx,
        )
    }
}

#[async_trait]
impl Station for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        let _ = self.tx.send(message);
        Ok(())
    }
}

/// Reports entering `handle`, then parks until the test grants a permit.
/// Declares a capacity-1 inbox to provoke overflow.
pub struct Blocker {
    name: String,
    entered: mpsc::UnboundedSender<String>,
    gate: Arc<Semaphore>,
}

impl Blocker {
    pub fn new(
        name: impl Into<String>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<String>, Arc<Semaphore>) {
        let (entered, rx) = mpsc::unbounded_channel();
        let gate = Arc::new(Semaphore::new(0));
        (
            Arc::new(Self {
                name: name.into(),
                entered,
                gate: Arc::clone(&gate),
            }),
            rx,
            gate,
        )
    }
}

#[async_trait]
impl Station for Blocker {
    fn name(&self) -> &str {
        &self.name
    }

    fn inbox_capacity(&self) -> Option<usize> {
        Some(1)
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        let _ = self.entered.send(message.action.clone());
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| StationError::handler("gate closed"))?;
        // Consume the permit: one grant releases exactly one message.
        permit.forget();
        Ok(())
    }
}

/// Fails on every message after reporting it.
pub struct Failing {
    name: String,
    entered: mpsc::UnboundedSender<String>,
}

impl Failing {
    pub fn new(name: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (entered, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                name: name.into(),
                entered,
            }),
            rx,
        )
    }
}

#[async_trait]
impl Station for Failing {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        let _ = self.entered.send(message.action.clone());
        Err(StationError::handler("synthetic failure"))
    }
}

/// Panics on every message after reporting it.
pub struct Panicking {
    name: String,
    entered: mpsc::UnboundedSender<String>,
}

impl Panicking {
    pub fn new(name: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (entered, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                name: name.into(),
                entered,
            }),
            rx,
        )
    }
}

#[async_trait]
impl Station for Panicking {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        let _ = self.entered.send(message.action.clone());
        panic!("synthetic panic");
    }
}

/// Records stop order into a shared vec; optionally refuses to start.
pub struct Lifecycle {
    name: String,
    stops: Arc<Mutex<Vec<String>>>,
    fail_start: bool,
}

impl Lifecycle {
    pub fn new(
        name: impl Into<String>,
        stops: Arc<Mutex<Vec<String>>>,
        fail_start: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            stops,
            fail_start,
        })
    }
}

#[async_trait]
impl Station for Lifecycle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, _message: Message) -> Result<(), StationError> {
        Ok(())
    }

    async fn on_start(&self) -> Result<(), StationError> {
        if self.fail_start {
            return Err(StationError::startup("refused by fixture"));
        }
        Ok(())
    }

    async fn on_stop(&self) {
        self.stops
            .lock()
            .expect("stop-order lock poisoned")
            .push(self.name.clone());
    }
}
