// File Path: src/api/readings.rs
//! Reading API Handlers
//! Temperature submission and reading history.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    models::{ApiResult, NewReading, Reading},
};

/// `POST /temp`. Responds with the stored reading and its derived status.
pub async fn submit_reading(
    State(state): State<AppState>,
    payload: Result<Json<NewReading>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reading>)> {
    let Json(input) = payload?;
    let reading = state.readings.submit(input).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

pub async fn list_readings(State(state): State<AppState>) -> ApiResult<Json<Vec<Reading>>> {
    Ok(Json(state.readings.readings().await?))
}

/// `GET /temp/:sensor_token`. An unknown token yields an empty list.
pub async fn list_readings_for_token(
    State(state): State<AppState>,
    Path(sensor_token): Path<String>,
) -> ApiResult<Json<Vec<Reading>>> {
    Ok(Json(state.readings.readings_for_token(&sensor_token).await?))
}
