// File Path: src/routes/health.rs
//! Health Check Routes
//!
//! Liveness of the process and readiness of the document store.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::api::state::AppState;

/// Health check endpoint
/// Returns "OK" if the server is running correctly
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness: 200 when the store answers a ping, 503 otherwise.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

/// Creates health-related routes and merges them into the main router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}
