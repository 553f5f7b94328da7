// File Path: src/services/evaluator.rs

//! # Reading Ingest & Status Evaluator
//!
//! Classifies an incoming temperature against the thresholds of the sensor
//! that owns the submitted token, updates the sensor's cached status when the
//! classification changes, and appends the reading.
//!
//! Status transitions:
//!
//! ```text
//! init -> good | bad
//! good -> bad,  bad -> good
//! good -> good, bad -> bad   (no status write)
//! ```
//!
//! Two readings for the same sensor processed at the same time each compare
//! against the status they read; whichever write reaches the store last wins.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    models::{NewReading, Reading, ReadingStatus, SensorStatus, ServiceError, ServiceResult},
    services::{clock::Clock, store::Store},
};

/// `Bad` when the temperature touches or crosses either threshold.
pub fn classify(temperature: f64, min_temp: f64, max_temp: f64) -> ReadingStatus {
    if temperature >= max_temp || temperature <= min_temp {
        ReadingStatus::Bad
    } else {
        ReadingStatus::Good
    }
}

pub struct ReadingService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ReadingService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Evaluates and stores one reading. An unknown token is `NotFound` and
    /// nothing is written.
    #[instrument(skip(self, input), fields(temp = input.temp))]
    pub async fn submit(&self, input: NewReading) -> ServiceResult<Reading> {
        let sensor = self
            .store
            .sensor_by_token(&input.sensor_token)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sensor token", input.sensor_token.as_str()))?;

        let status = classify(input.temp, sensor.min_temp, sensor.max_temp);
        let next = SensorStatus::from(status);
        let changed = (next != sensor.status).then_some(next);

        let reading = Reading {
            sensor_token: input.sensor_token,
            timestamp: self.clock.now().timestamp(),
            temperature: input.temp,
            status,
        };
        self.store.record_reading(&sensor.id, &reading, changed).await?;

        if changed.is_some() {
            info!(
                sensor_id = %sensor.id,
                from = %sensor.status,
                to = %next,
                "Sensor status changed"
            );
        }
        Ok(reading)
    }

    pub async fn readings(&self) -> ServiceResult<Vec<Reading>> {
        Ok(self.store.readings().await?)
    }

    pub async fn readings_for_token(&self, token: &str) -> ServiceResult<Vec<Reading>> {
        Ok(self.store.readings_for_token(token).await?)
    }
}
