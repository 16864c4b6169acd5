//! WebSocket server streaming system stats to connected clients
//!
//! ## Endpoints
//!
//! - `WS /ws` - upgrade and receive one stats envelope per tick
//! - `GET /health` - liveness and connected-client count

pub mod health;
pub mod websocket;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::actors::hub::HubHandle;

/// Shared state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Handle to the hub for registration and status queries
    pub hub: HubHandle,
}

/// Spawn the server
///
/// Binds the listener and serves in a background task. A failed bind is the
/// only fatal error in the system and is propagated to the caller; everything
/// after it is handled per connection. Returns the bound address.
pub async fn spawn_server(bind_addr: SocketAddr, hub: HubHandle) -> anyhow::Result<SocketAddr> {
    let app = Router::new()
        .route("/ws", get(websocket::websocket_handler))
        .route("/health", get(health::health_check))
        .with_state(AppState { hub })
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("listening on {addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("server error: {e}");
        }
    });

    Ok(addr)
}
