// File Path: src/routes/registry.rs

//! Registry Routes
//!
//! Hospitals, groups and sensors.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{registry, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hospital", post(registry::create_hospital))
        .route("/hospitals", get(registry::list_hospitals))
        .route("/hospital/:id", get(registry::get_hospital))
        .route("/group/:id", post(registry::create_group).get(registry::get_group))
        .route("/groups", get(registry::list_groups))
        .route("/sensor/:id", post(registry::create_sensor).get(registry::get_sensor))
        .route("/sensors", get(registry::list_sensors))
}
