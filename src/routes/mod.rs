// src/routes/mod.rs

//! # Routes Module
//!
//! Defines the main routing structure for the Axum server.

use std::time::Duration;

use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::state::AppState;

pub mod health;
pub mod readings;
pub mod registry;

/// Creates and configures the main application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(registry::routes())
        .merge(readings::routes())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
