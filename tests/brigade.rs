//! Brigade-level behavior: registration, ordered startup/shutdown,
//! partial-start semantics, and a multi-station pipeline.

mod support;

use std::sync::{Arc, Mutex};

use tokio_test::assert_ok;

use brigade::{Brigade, BrigadeError, Message, Outbox, Priority, Station, StationError};
use support::{recv_timeout, Lifecycle, Recorder};

#[tokio::test]
async fn end_to_end_delivery_through_a_brigade() {
    let mut brigade = Brigade::new();
    let (recorder, mut rx) = Recorder::new("sink");
    assert_ok!(brigade.register(recorder));
    assert_eq!(brigade.station_names(), ["sink"]);
    assert_eq!(brigade.station_count(), 1);

    brigade.open().await.expect("brigade opens");
    assert!(brigade.is_open());

    brigade
        .bus()
        .publish(Message::new("tui", "sink", "new_ticket").expect("valid message"));
    brigade.wait_idle().await;
    assert_eq!(recv_timeout(&mut rx).await.action, "new_ticket");

    brigade.close().await;
    assert!(!brigade.is_open());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    // Silent overwrite would hide a misconfigured brigade; rejection is
    // the deliberate behavior here, not an accident of the registry type.
    let mut brigade = Brigade::new();
    let (first, _rx1) = Recorder::new("dup");
    let (second, _rx2) = Recorder::new("dup");

    assert_ok!(brigade.register(first));
    let err = brigade.register(second).unwrap_err();
    assert!(matches!(
        err,
        BrigadeError::DuplicateStation { ref station } if station.as_str() == "dup"
    ));
    assert_eq!(brigade.station_count(), 1);
}

#[tokio::test]
async fn close_stops_stations_in_reverse_registration_order() {
    let stops = Arc::new(Mutex::new(Vec::new()));
    let mut brigade = Brigade::new();
    for name in ["s1", "s2", "s3"] {
        assert_ok!(brigade.register(Lifecycle::new(name, Arc::clone(&stops), false)));
    }

    brigade.open().await.expect("brigade opens");
    brigade.close().await;

    let order = stops.lock().expect("stop-order lock poisoned").clone();
    assert_eq!(order, ["s3", "s2", "s1"]);
}

#[tokio::test]
async fn open_failure_propagates_without_rollback() {
    let stops = Arc::new(Mutex::new(Vec::new()));
    let mut brigade = Brigade::new();
    assert_ok!(brigade.register(Lifecycle::new("ok-early", Arc::clone(&stops), false)));
    assert_ok!(brigade.register(Lifecycle::new("refuses", Arc::clone(&stops), true)));
    assert_ok!(brigade.register(Lifecycle::new("never-reached", Arc::clone(&stops), false)));

    let err = brigade.open().await.unwrap_err();
    assert!(matches!(
        err,
        BrigadeError::StationStart { ref station, .. } if station.as_str() == "refuses"
    ));

    // Partial start: the bus and earlier stations are running, later ones
    // never started, and the brigade does not count as open.
    assert!(brigade.bus().is_running());
    assert!(brigade.get_station("ok-early").expect("registered").is_running());
    assert!(!brigade.get_station("refuses").expect("registered").is_running());
    assert!(!brigade
        .get_station("never-reached")
        .expect("registered")
        .is_running());
    assert!(!brigade.is_open());

    // Explicit close unwinds whatever did start.
    brigade.close().await;
    assert!(!brigade.bus().is_running());
    let order = stops.lock().expect("stop-order lock poisoned").clone();
    assert_eq!(order, ["ok-early"], "only started stations observe on_stop");
}

#[tokio::test]
async fn brigade_reopens_after_close() {
    let mut brigade = Brigade::new();
    let (recorder, mut rx) = Recorder::new("sink");
    assert_ok!(brigade.register(recorder));

    brigade.open().await.expect("first open");
    brigade.close().await;
    brigade.close().await; // idempotent

    brigade.open().await.expect("second open");
    brigade
        .bus()
        .publish(Message::new("tui", "sink", "again").expect("valid message"));
    assert_eq!(recv_timeout(&mut rx).await.action, "again");
    brigade.close().await;
}

/// Splits a ticket into one `IMPLEMENT` task for the builder.
struct Planner {
    outbox: Outbox,
}

#[async_trait::async_trait]
impl Station for Planner {
    fn name(&self) -> &str {
        "planner"
    }

    async fn handle(&self, message: Message) -> Result<(), StationError> {
        if let Some(brigade::Action::NewTicket) = brigade::Action::parse(&message.action) {
            self.outbox
                .send(
                    "builder",
                    brigade::Action::Implement.as_str(),
                    Some(serde_json::json!({"ticket": message.payload})),
                    Priority::High,
                )
                .map_err(|e| StationError::handler(e.to_string()))?;
        }
        Ok(())
    }
}

#[tokio::test]
async fn stations_chain_through_the_bus() {
    let mut brigade = Brigade::new();
    let outbox = Outbox::new("planner", brigade.bus().clone());
    assert_ok!(brigade.register(Arc::new(Planner { outbox })));
    let (builder, mut builder_rx) = Recorder::new("builder");
    assert_ok!(brigade.register(builder));

    brigade.open().await.expect("brigade opens");
    brigade.bus().publish(
        Message::new("tui", "planner", "new_ticket")
            .expect("valid message")
            .with_payload(serde_json::json!({"request": "do the thing"}))
            .expect("object payload"),
    );

    let delegated = recv_timeout(&mut builder_rx).await;
    assert_eq!(delegated.action, "IMPLEMENT");
    assert_eq!(delegated.sender, "planner");
    assert_eq!(delegated.priority, Priority::High);
    assert_eq!(delegated.payload["ticket"]["request"], "do the thing");

    brigade.close().await;
}
