// File Path: src/api/registry.rs
//! Registry API Handlers
//! Create and fetch hospitals, groups and sensors.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    models::{ApiResult, Group, Hospital, NewGroup, NewHospital, NewSensor, Sensor},
};

/// `POST /hospital`
pub async fn create_hospital(
    State(state): State<AppState>,
    payload: Result<Json<NewHospital>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Hospital>)> {
    let Json(input) = payload?;
    let hospital = state.registry.create_hospital(input).await?;
    Ok((StatusCode::CREATED, Json(hospital)))
}

pub async fn list_hospitals(State(state): State<AppState>) -> ApiResult<Json<Vec<Hospital>>> {
    Ok(Json(state.registry.hospitals().await?))
}

pub async fn get_hospital(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Hospital>> {
    Ok(Json(state.registry.hospital(&id).await?))
}

/// `POST /group/:hospital_id`
pub async fn create_group(
    State(state): State<AppState>,
    Path(hospital_id): Path<String>,
    payload: Result<Json<NewGroup>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    let Json(input) = payload?;
    let group = state.registry.create_group(&hospital_id, input).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<Group>>> {
    Ok(Json(state.registry.groups().await?))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.registry.group(&id).await?))
}

/// `POST /sensor/:group_id`. The created sensor always starts in `init`.
pub async fn create_sensor(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    payload: Result<Json<NewSensor>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Sensor>)> {
    let Json(input) = payload?;
    let sensor = state.registry.create_sensor(&group_id, input).await?;
    Ok((StatusCode::CREATED, Json(sensor)))
}

pub async fn list_sensors(State(state): State<AppState>) -> ApiResult<Json<Vec<Sensor>>> {
    Ok(Json(state.registry.sensors().await?))
}

pub async fn get_sensor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sensor>> {
    Ok(Json(state.registry.sensor(&id).await?))
}
