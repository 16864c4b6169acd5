//! WebSocket handler for real-time stats streaming

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::actors::hub::{CLIENT_QUEUE_CAPACITY, HubHandle};
use crate::actors::messages::ClientId;

use super::AppState;

/// WebSocket upgrade handler
///
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state.hub))
}

/// Handle one WebSocket connection from registration to removal
///
/// The client is registered before the socket is touched, so there is no
/// window where it is readable but not a broadcast target. Two tasks then
/// drive the socket: a writer draining the outbound queue into the sink, and
/// a reader whose only job is to notice closure. Whichever finishes first
/// tears the other down, and the client is deregistered on the way out. The
/// hub may already have evicted it by then; a duplicate removal is a no-op.
async fn handle_websocket(socket: WebSocket, hub: HubHandle) {
    let id = ClientId::next();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(CLIENT_QUEUE_CAPACITY);

    if hub.register(id, outbound_tx).await.is_err() {
        // hub is shutting down; drop the socket without ever serving it
        return;
    }

    info!(%id, "WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();

    // Forward queued envelopes to the socket until the queue closes or a
    // send fails
    let mut send_task = tokio::spawn(async move {
        while let Some(envelope) = outbound_rx.recv().await {
            if sender.send(envelope).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Liveness watcher: a blocking read that only returns on closure or error
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                _ => {
                    // inbound payloads are ignored
                }
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    let _ = hub.deregister(id).await;

    info!(%id, "WebSocket client disconnected");
}
