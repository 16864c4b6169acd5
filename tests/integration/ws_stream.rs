//! End-to-end streaming over real WebSocket connections

use futures::StreamExt;
use pretty_assertions::assert_eq;
use sysstream::SystemStats;
use sysstream::actors::broadcaster::BroadcasterHandle;
use sysstream::actors::hub::HubHandle;
use sysstream::server::spawn_server;
use tokio_tungstenite::connect_async;

use crate::helpers::{FixedSampler, stats, wait_for_clients};

async fn spawn_pipeline(sample: SystemStats) -> (HubHandle, BroadcasterHandle, String) {
    let hub = HubHandle::spawn();
    let broadcaster = BroadcasterHandle::spawn(FixedSampler(sample), hub.clone());
    let addr = spawn_server("127.0.0.1:0".parse().unwrap(), hub.clone())
        .await
        .unwrap();

    (hub, broadcaster, format!("ws://{addr}/ws"))
}

#[tokio::test]
async fn snapshot_streams_to_every_connected_client() {
    let sample = stats(12.5, 47.0, 83.2);
    let (hub, broadcaster, url) = spawn_pipeline(sample).await;

    let (mut c1, _) = connect_async(url.as_str()).await.unwrap();
    let (mut c2, _) = connect_async(url.as_str()).await.unwrap();
    wait_for_clients(&hub, 2).await;

    assert_eq!(broadcaster.sample_now().await.unwrap(), 2);

    for client in [&mut c1, &mut c2] {
        let frame = client.next().await.unwrap().unwrap();
        let received: SystemStats = serde_json::from_str(&frame.into_text().unwrap()).unwrap();
        assert_eq!(received, sample);
    }
}

#[tokio::test]
async fn closed_client_is_removed_and_skipped() {
    let sample = stats(1.0, 2.0, 3.0);
    let (hub, broadcaster, url) = spawn_pipeline(sample).await;

    let (mut c1, _) = connect_async(url.as_str()).await.unwrap();
    let (mut c2, _) = connect_async(url.as_str()).await.unwrap();
    wait_for_clients(&hub, 2).await;

    assert_eq!(broadcaster.sample_now().await.unwrap(), 2);
    c1.next().await.unwrap().unwrap();
    c2.next().await.unwrap().unwrap();

    // client 1 disconnects; its liveness watcher deregisters it
    c1.close(None).await.unwrap();
    wait_for_clients(&hub, 1).await;

    assert_eq!(broadcaster.sample_now().await.unwrap(), 1);
    let frame = c2.next().await.unwrap().unwrap();
    let received: SystemStats = serde_json::from_str(&frame.into_text().unwrap()).unwrap();
    assert_eq!(received, sample);
}
