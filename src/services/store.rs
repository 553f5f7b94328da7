// File Path: src/services/store.rs

//! # Store
//!
//! The persistence seam between the services and the document store. The
//! production implementation is [`RedisStore`](super::redis_service::RedisStore);
//! tests use an in-memory implementation.

use async_trait::async_trait;

use crate::models::{Group, Hospital, Reading, Sensor, SensorStatus, StoreResult};

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_hospital(&self, hospital: &Hospital) -> StoreResult<()>;

    async fn hospital(&self, id: &str) -> StoreResult<Option<Hospital>>;

    /// All hospitals in insertion order.
    async fn hospitals(&self) -> StoreResult<Vec<Hospital>>;

    async fn hospital_exists(&self, id: &str) -> StoreResult<bool>;

    /// Inserts the group and appends its id to `group.hospital_id`'s group
    /// list. Both writes succeed or neither does.
    async fn insert_group(&self, group: &Group) -> StoreResult<()>;

    async fn group(&self, id: &str) -> StoreResult<Option<Group>>;

    async fn groups(&self) -> StoreResult<Vec<Group>>;

    async fn group_exists(&self, id: &str) -> StoreResult<bool>;

    /// Inserts the sensor, indexes its token and appends its id to
    /// `sensor.group_id`'s sensor list, atomically.
    async fn insert_sensor(&self, sensor: &Sensor) -> StoreResult<()>;

    async fn sensor(&self, id: &str) -> StoreResult<Option<Sensor>>;

    async fn sensors(&self) -> StoreResult<Vec<Sensor>>;

    async fn sensor_by_token(&self, token: &str) -> StoreResult<Option<Sensor>>;

    /// Appends `reading` and, when `new_status` is set, overwrites the cached
    /// status of `sensor_id`, in one atomic write.
    async fn record_reading(
        &self,
        sensor_id: &str,
        reading: &Reading,
        new_status: Option<SensorStatus>,
    ) -> StoreResult<()>;

    /// All readings in arrival order.
    async fn readings(&self) -> StoreResult<Vec<Reading>>;

    async fn readings_for_token(&self, token: &str) -> StoreResult<Vec<Reading>>;

    async fn ping(&self) -> StoreResult<()>;
}
