//! Fan-out behavior of the hub across client lifecycles
//!
//! These tests drive the hub with raw client queues, the same interface the
//! WebSocket layer uses, to pin down membership and delivery semantics:
//! - a removed client never sees later ticks
//! - concurrent membership changes and broadcasts do not interfere
//! - duplicate removal requests are harmless

use axum::extract::ws::Message;
use sysstream::actors::hub::HubHandle;
use sysstream::actors::messages::ClientId;
use tokio::sync::mpsc;

fn envelope(text: &str) -> Message {
    Message::Text(text.to_string())
}

fn text_of(msg: Option<Message>) -> String {
    match msg {
        Some(Message::Text(text)) => text,
        other => panic!("expected a text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn removed_client_misses_later_ticks() {
    let hub = HubHandle::spawn();

    let c1 = ClientId::next();
    let (tx1, mut rx1) = mpsc::channel(8);
    hub.register(c1, tx1).await.unwrap();

    let c2 = ClientId::next();
    let (tx2, mut rx2) = mpsc::channel(8);
    hub.register(c2, tx2).await.unwrap();

    // tick 1 reaches both
    assert_eq!(hub.broadcast(envelope("E1")).await.unwrap(), 2);
    assert_eq!(text_of(rx1.recv().await), "E1");
    assert_eq!(text_of(rx2.recv().await), "E1");

    // client 1 goes away before tick 2
    hub.deregister(c1).await.unwrap();

    assert_eq!(hub.broadcast(envelope("E2")).await.unwrap(), 1);
    assert_eq!(text_of(rx2.recv().await), "E2");

    // nothing further ever reaches client 1
    assert!(rx1.recv().await.is_none());
}

#[tokio::test]
async fn concurrent_registrations_and_broadcasts_do_not_interfere() {
    let hub = HubHandle::spawn();

    // hammer broadcasts while clients register from separate tasks
    let ticker = {
        let hub = hub.clone();
        tokio::spawn(async move {
            for tick in 0..50 {
                hub.broadcast(envelope(&format!("tick-{tick}"))).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let mut registrations = vec![];
    for _ in 0..8 {
        let hub = hub.clone();
        registrations.push(tokio::spawn(async move {
            let id = ClientId::next();
            let (tx, rx) = mpsc::channel(64);
            hub.register(id, tx).await.unwrap();
            rx
        }));
    }

    let mut receivers = vec![];
    for registration in registrations {
        receivers.push(registration.await.unwrap());
    }
    ticker.await.unwrap();

    assert_eq!(hub.client_count().await.unwrap(), 8);

    // every client is now a member; a fresh broadcast reaches all of them
    assert_eq!(hub.broadcast(envelope("final")).await.unwrap(), 8);
    for rx in &mut receivers {
        loop {
            if text_of(rx.recv().await) == "final" {
                break;
            }
        }
    }
}

#[tokio::test]
async fn duplicate_removal_requests_are_harmless() {
    let hub = HubHandle::spawn();

    let id = ClientId::next();
    let (tx, _rx) = mpsc::channel(8);
    hub.register(id, tx).await.unwrap();

    // watcher and eviction racing to remove the same client
    let first = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.deregister(id).await })
    };
    let second = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.deregister(id).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(hub.client_count().await.unwrap(), 0);
}
