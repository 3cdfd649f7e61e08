//! # LogStation — simple message printer
//!
//! A minimal station that forwards every message it receives to
//! `tracing`. Use it for test or demo: register it under a name stations
//! already report to (e.g. `"tui"`), or send it `LOG_MESSAGE` traffic.
//!
//! ## Example output
//! ```text
//! INFO brigade::stations::log: status sender="planner" status="3 tasks queued"
//! INFO brigade::stations::log: log sender="builder" text="build finished"
//! DEBUG brigade::stations::log: message sender="tester" action="TASK_COMPLETE"
//! ```

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::StationError;
use crate::messages::{Action, Message};
use crate::stations::station::Station;

/// Message printer station.
pub struct LogStation {
    name: String,
}

impl LogStation {
    /// Construct a new [`LogStation`] registered under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogStation {
    fn default() -> Self {
        Self::new("log")
    }
}

#[async_trait]
impl Station for LogStation {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        let text = |key: &str| -> String {
            match message.payload.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            }
        };

        match Action::parse(&message.action) {
            Some(Action::LogMessage) => {
                info!(sender = %message.sender, text = %text("text"), "log");
            }
            Some(Action::StatusUpdate) => {
                info!(sender = %message.sender, status = %text("status"), "status");
            }
            _ => {
                debug!(sender = %message.sender, action = %message.action, "message");
            }
        }
        Ok(())
    }
}
