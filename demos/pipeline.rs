//! # Ticket pipeline
//!
//! Demonstrates the core flow:
//! - Stations chaining work through the bus (plan → implement → report)
//! - An Outbox per station for replies
//! - Priorities deciding dispatch order
//! - Ordered startup/shutdown through the Brigade
//!
//! ## Run
//! ```bash
//! cargo run --example pipeline
//! ```

use std::sync::Arc;

use serde_json::json;

use brigade::{Action, Brigade, Message, Outbox, Priority, Station, StationError};

/// Breaks a ticket into one task for the builder.
struct Planner {
    outbox: Outbox,
}

#[async_trait::async_trait]
impl Station for Planner {
    fn name(&self) -> &str {
        "planner"
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        match Action::parse(&message.action) {
            Some(Action::NewTicket) => {
                let request = message.payload["request"].clone();
                println!("📋 Planner: ticket received: {request}");
                self.outbox
                    .send(
                        "builder",
                        Action::Implement.as_str(),
                        Some(json!({"request": request})),
                        Priority::High,
                    )
                    .map_err(|e| StationError::handler(e.to_string()))
            }
            Some(Action::TaskComplete) => {
                println!("📋 Planner: builder is done, closing the ticket");
                self.outbox
                    .send(
                        "tui",
                        Action::TicketDone.as_str(),
                        Some(json!({"status": "done"})),
                        Priority::High,
                    )
                    .map_err(|e| StationError::handler(e.to_string()))
            }
            _ => Ok(()), // unrecognized traffic: deliberate no-op
        }
    }
}

/// Pretends to implement whatever it is handed.
struct Builder {
    outbox: Outbox,
}

#[async_trait::async_trait]
impl Station for Builder {
    fn name(&self) -> &str {
        "builder"
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        if Action::parse(&message.action) == Some(Action::Implement) {
            println!("🔨 Builder: implementing {}", message.payload["request"]);
            self.outbox
                .send("planner", Action::TaskComplete.as_str(), None, Priority::Normal)
                .map_err(|e| StationError::handler(e.to_string()))?;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Surface bus warnings (drops, handler failures) on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut brigade = Brigade::new();

    let planner_outbox = Outbox::new("planner", brigade.bus().clone());
    let builder_outbox = Outbox::new("builder", brigade.bus().clone());
    brigade.register(Arc::new(Planner {
        outbox: planner_outbox,
    }))?;
    brigade.register(Arc::new(Builder {
        outbox: builder_outbox,
    }))?;

    // The "UI" is a plain subscriber, not a station.
    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    brigade.bus().subscribe_sync("tui", move |message| {
        println!("🖥️  UI: {} from {}", message.action, message.sender);
        if Action::parse(&message.action) == Some(Action::TicketDone) {
            let _ = done_tx.send(());
        }
    });

    brigade.open().await?;
    println!("Kitchen is open with: {:?}", brigade.station_names());

    brigade.bus().publish(
        Message::new("tui", "planner", Action::NewTicket.as_str())?
            .with_payload(json!({"request": "add a README"}))?,
    );

    // Wait for the ticket to travel the whole pipeline.
    let _ = done_rx.recv().await;
    brigade.wait_idle().await;

    brigade.close().await;
    println!("Kitchen is closed");
    Ok(())
}
