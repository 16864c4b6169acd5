//! Health check endpoint

use axum::{Json, extract::State};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connected_clients: usize,
}

/// GET /health
///
/// Reports liveness and the number of currently connected clients.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected_clients = state.hub.client_count().await.unwrap_or(0);

    Json(HealthResponse {
        status: "ok",
        connected_clients,
    })
}
