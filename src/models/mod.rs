// File Path: src/models/mod.rs

//! # Models
//!
//! Wire and storage documents for hospitals, groups, sensors and readings,
//! the request bodies that create them, and the error types shared by the
//! store, service and HTTP layers.

// =========================================================================================
// SECTION 1: IMPORTS
// =========================================================================================

use std::{fmt, str::FromStr, time::Duration};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

// =========================================================================================
// SECTION 2: STATUS
// =========================================================================================

/// Cached health of a sensor. Starts at `Init` and only changes when a reading is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Init,
    Good,
    Bad,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Init => "init",
            SensorStatus::Good => "good",
            SensorStatus::Bad => "bad",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(SensorStatus::Init),
            "good" => Ok(SensorStatus::Good),
            "bad" => Ok(SensorStatus::Bad),
            other => Err(format!("unknown sensor status '{}'", other)),
        }
    }
}

/// Classification of a single reading. Never `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Good,
    Bad,
}

impl From<ReadingStatus> for SensorStatus {
    fn from(status: ReadingStatus) -> Self {
        match status {
            ReadingStatus::Good => SensorStatus::Good,
            ReadingStatus::Bad => SensorStatus::Bad,
        }
    }
}

// =========================================================================================
// SECTION 3: ENTITY DOCUMENTS
// =========================================================================================

/// Top-level tenant owning one or more groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

/// A named collection of sensors belonging to one hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub hospital_id: String,
    pub name: String,
    /// Stored for a future notification integration; nothing reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_token: Option<String>,
    #[serde(default)]
    pub sensor_ids: Vec<String>,
}

/// A temperature-reporting device. Readings are attributed to it by `token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: String,
    pub group_id: String,
    pub token: String,
    pub name: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub notify: bool,
    pub accept_data: bool,
    pub status: SensorStatus,
}

/// A single timestamped observation. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub sensor_token: String,
    /// Unix seconds, assigned by the server.
    pub timestamp: i64,
    pub temperature: f64,
    pub status: ReadingStatus,
}

// =========================================================================================
// SECTION 4: REQUEST BODIES
// =========================================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHospital {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub notify_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSensor {
    pub name: String,
    pub min_temp: f64,
    pub max_temp: f64,
    #[serde(default)]
    pub notify: bool,
    #[serde(default)]
    pub accept_data: bool,
}

/// Body of `POST /temp`. There is deliberately no status field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub sensor_token: String,
    pub temp: f64,
}

// =========================================================================================
// SECTION 5: ERROR HANDLING
// =========================================================================================

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Document decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Corrupt record at '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures raised by the registry and reading services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::ValidationError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::StoreUnavailable(detail) => {
                error!("Store failure while serving request: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Store unavailable".to_string())
            }
        };

        let body = serde_json::json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(inner: ServiceError) -> Self {
        match inner {
            ServiceError::NotFound { .. } => ApiError::NotFound(inner.to_string()),
            ServiceError::Validation(msg) => ApiError::ValidationError(msg),
            ServiceError::Store(e) => ApiError::StoreUnavailable(e.to_string()),
        }
    }
}

// Every body rejection (syntax, missing field, content type) is a 400 here.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
