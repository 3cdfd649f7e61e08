//! # Raw bus listener
//!
//! Shows how a UI layer observes traffic without being a full station:
//! - An async subscriber callback tailing its own name
//! - A broadcast that reaches every station and subscriber
//! - Priority order for messages queued before the bus starts
//!
//! ## Run
//! ```bash
//! cargo run --example bus_listener
//! ```

use std::sync::Arc;

use brigade::{Brigade, Message, Priority, Station, StationError, BROADCAST};

/// Prints whatever it is told.
struct Worker {
    name: String,
}

#[async_trait::async_trait]
impl Station for Worker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        println!("⚙️  {}: {} (from {})", self.name, message.action, message.sender);
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
    brigade.register(Arc::new(Worker {
        name: "alpha".into(),
    }))?;
    brigade.register(Arc::new(Worker {
        name: "beta".into(),
    }))?;

    // Async subscriber: awaited by the dispatch loop per message.
    brigade.bus().subscribe("tui", |message| async move {
        println!(
            "🖥️  UI saw: {} [{:?}] from {}",
            message.action, message.priority, message.sender
        );
    });

    // Queue a burst before the bus starts: dispatch order is priority
    // order, not publish order.
    for (action, priority) in [
        ("cleanup", Priority::Low),
        ("abort-everything", Priority::Critical),
        ("routine-report", Priority::Normal),
        ("user-request", Priority::High),
    ] {
        brigade
            .bus()
            .publish(Message::new("demo", "tui", action)?.with_priority(priority));
    }

    brigade.open().await?;
    brigade.wait_idle().await;

    // Broadcast: every station and every subscriber sees it once.
    brigade
        .bus()
        .publish(Message::new("demo", BROADCAST, "STATUS_REQUEST")?);
    brigade.wait_idle().await;

    // Give the station workers a beat to drain their inboxes.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    brigade.close().await;
    Ok(())
}
