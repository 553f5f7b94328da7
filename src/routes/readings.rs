// File Path: src/routes/readings.rs

//! Reading Routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{readings, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/temp", post(readings::submit_reading))
        .route("/temps", get(readings::list_readings))
        .route("/temp/:sensor_token", get(readings::list_readings_for_token))
}
