// File Path: src/services/redis_service.rs

//! # Redis Store
//!
//! Persistence gateway backed by a single multiplexed Redis connection that is
//! opened once at startup and cloned into every request.
//!
//! ## Key layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `{db}:hospital:{id}` | hospital document (JSON) |
//! | `{db}:hospital-groups:{id}` | list of group ids |
//! | `{db}:group:{id}` | group document (JSON) |
//! | `{db}:group-sensors:{id}` | list of sensor ids |
//! | `{db}:sensor:{id}` | sensor document (JSON) |
//! | `{db}:sensor-status:{id}` | cached status, authoritative over the document |
//! | `{db}:sensor-token:{token}` | sensor id |
//! | `{db}:hospitals`, `{db}:groups`, `{db}:sensors` | ids in insertion order |
//! | `{db}:readings` | all reading documents (JSON) |
//! | `{db}:sensor-readings:{token}` | reading documents for one token (JSON) |
//!
//! Ids come from request paths and may contain `:`. Every family has its own
//! prefix, so `{db}:hospital:{id}` can only ever name a hospital document.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, instrument};

use crate::{
    config::StoreConfig,
    models::{Group, Hospital, Reading, Sensor, SensorStatus, StoreError, StoreResult},
    services::store::Store,
};

/// Builds every key the store touches.
#[derive(Debug, Clone)]
pub struct Keys {
    namespace: String,
}

impl Keys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    fn member(&self, family: &str, id: &str) -> String {
        format!("{}:{}:{}", self.namespace, family, id)
    }

    fn index(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }

    pub fn hospital(&self, id: &str) -> String {
        self.member("hospital", id)
    }

    pub fn hospital_groups(&self, id: &str) -> String {
        self.member("hospital-groups", id)
    }

    pub fn hospitals(&self) -> String {
        self.index("hospitals")
    }

    pub fn group(&self, id: &str) -> String {
        self.member("group", id)
    }

    pub fn group_sensors(&self, id: &str) -> String {
        self.member("group-sensors", id)
    }

    pub fn groups(&self) -> String {
        self.index("groups")
    }

    pub fn sensor(&self, id: &str) -> String {
        self.member("sensor", id)
    }

    pub fn sensor_status(&self, id: &str) -> String {
        self.member("sensor-status", id)
    }

    pub fn sensor_token(&self, token: &str) -> String {
        self.member("sensor-token", token)
    }

    pub fn sensors(&self) -> String {
        self.index("sensors")
    }

    pub fn readings(&self) -> String {
        self.index("readings")
    }

    pub fn sensor_readings(&self, token: &str) -> String {
        self.member("sensor-readings", token)
    }

    /// Pattern matching every key under this namespace.
    pub fn all(&self) -> String {
        format!("{}:*", self.namespace)
    }
}

#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    keys: Keys,
    op_timeout: Duration,
}

impl RedisStore {
    /// Opens the connection. Fails if Redis cannot be reached within
    /// `config.connect_timeout`; there is no retry.
    #[instrument(skip(config), fields(db = %config.db_name))]
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let url = config.redis_url.as_str();
        info!("Connecting to Redis at {}", url);

        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(
            config.connect_timeout,
            client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| StoreError::Timeout(config.connect_timeout))??;

        info!("Connected to Redis at {}", url);

        Ok(Self {
            conn,
            keys: Keys::new(config.db_name.as_str()),
            op_timeout: config.op_timeout,
        })
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Bounds a single round-trip by the operation timeout.
    async fn run<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.op_timeout))?
            .map_err(StoreError::from)
    }

    async fn exists(&self, key: String) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        self.run(conn.exists(key)).await
    }

    async fn ids(&self, key: String) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        self.run(conn.lrange(key, 0, -1)).await
    }

    /// Fetches a document together with one companion key in a single
    /// pipeline: a child id list for hospitals and groups, the status for sensors.
    async fn document_with<T, C>(
        &self,
        doc_key: String,
        companion: redis::Cmd,
    ) -> StoreResult<Option<(T, C)>>
    where
        T: DeserializeOwned,
        C: redis::FromRedisValue,
    {
        let mut pipe = redis::pipe();
        pipe.get(&doc_key).add_command(companion);

        let mut conn = self.conn.clone();
        let (raw, companion): (Option<String>, C) = self.run(pipe.query_async(&mut conn)).await?;

        match raw {
            None => Ok(None),
            Some(raw) => Ok(Some((serde_json::from_str(&raw)?, companion))),
        }
    }

    async fn list_of<T, F, Fut>(&self, index_key: String, fetch: F) -> StoreResult<Vec<T>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = StoreResult<Option<T>>>,
    {
        let mut out = Vec::new();
        for id in self.ids(index_key).await? {
            // An id listed in the index always has its document; the two are
            // written in the same transaction.
            if let Some(doc) = fetch(id).await? {
                out.push(doc);
            }
        }
        Ok(out)
    }

    async fn reading_list(&self, key: String) -> StoreResult<Vec<Reading>> {
        let raw = self.ids(key).await?;
        raw.iter()
            .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
            .collect()
    }
}

fn to_json<T: Serialize>(doc: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(doc)?)
}

fn lrange_all(key: String) -> redis::Cmd {
    let mut cmd = redis::cmd("LRANGE");
    cmd.arg(key).arg(0).arg(-1);
    cmd
}

#[async_trait]
impl Store for RedisStore {
    async fn insert_hospital(&self, hospital: &Hospital) -> StoreResult<()> {
        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(self.keys.hospital(&hospital.id), to_json(hospital)?)
            .ignore()
            .rpush(self.keys.hospitals(), &hospital.id)
            .ignore();

        let mut conn = self.conn.clone();
        self.run(pipe.query_async(&mut conn)).await
    }

    async fn hospital(&self, id: &str) -> StoreResult<Option<Hospital>> {
        let found = self
            .document_with::<Hospital, Vec<String>>(
                self.keys.hospital(id),
                lrange_all(self.keys.hospital_groups(id)),
            )
            .await?;

        Ok(found.map(|(mut hospital, group_ids)| {
            hospital.group_ids = group_ids;
            hospital
        }))
    }

    async fn hospitals(&self) -> StoreResult<Vec<Hospital>> {
        self.list_of(self.keys.hospitals(), |id| async move { self.hospital(&id).await })
            .await
    }

    async fn hospital_exists(&self, id: &str) -> StoreResult<bool> {
        self.exists(self.keys.hospital(id)).await
    }

    async fn insert_group(&self, group: &Group) -> StoreResult<()> {
        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(self.keys.group(&group.id), to_json(group)?)
            .ignore()
            .rpush(self.keys.groups(), &group.id)
            .ignore()
            .rpush(self.keys.hospital_groups(&group.hospital_id), &group.id)
            .ignore();

        let mut conn = self.conn.clone();
        self.run(pipe.query_async(&mut conn)).await
    }

    async fn group(&self, id: &str) -> StoreResult<Option<Group>> {
        let found = self
            .document_with::<Group, Vec<String>>(
                self.keys.group(id),
                lrange_all(self.keys.group_sensors(id)),
            )
            .await?;

        Ok(found.map(|(mut group, sensor_ids)| {
            group.sensor_ids = sensor_ids;
            group
        }))
    }

    async fn groups(&self) -> StoreResult<Vec<Group>> {
        self.list_of(self.keys.groups(), |id| async move { self.group(&id).await })
            .await
    }

    async fn group_exists(&self, id: &str) -> StoreResult<bool> {
        self.exists(self.keys.group(id)).await
    }

    async fn insert_sensor(&self, sensor: &Sensor) -> StoreResult<()> {
        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(self.keys.sensor(&sensor.id), to_json(sensor)?)
            .ignore()
            .set(self.keys.sensor_status(&sensor.id), sensor.status.as_str())
            .ignore()
            .set(self.keys.sensor_token(&sensor.token), &sensor.id)
            .ignore()
            .rpush(self.keys.sensors(), &sensor.id)
            .ignore()
            .rpush(self.keys.group_sensors(&sensor.group_id), &sensor.id)
            .ignore();

        let mut conn = self.conn.clone();
        self.run(pipe.query_async(&mut conn)).await
    }

    async fn sensor(&self, id: &str) -> StoreResult<Option<Sensor>> {
        let status_key = self.keys.sensor_status(id);
        let mut status_cmd = redis::cmd("GET");
        status_cmd.arg(&status_key);

        let found = self
            .document_with::<Sensor, Option<String>>(self.keys.sensor(id), status_cmd)
            .await?;

        let Some((mut sensor, status)) = found else {
            return Ok(None);
        };
        if let Some(status) = status {
            sensor.status = status
                .parse::<SensorStatus>()
                .map_err(|reason| StoreError::Corrupt { key: status_key, reason })?;
        }
        Ok(Some(sensor))
    }

    async fn sensors(&self) -> StoreResult<Vec<Sensor>> {
        self.list_of(self.keys.sensors(), |id| async move { self.sensor(&id).await })
            .await
    }

    async fn sensor_by_token(&self, token: &str) -> StoreResult<Option<Sensor>> {
        let mut conn = self.conn.clone();
        let id: Option<String> = self.run(conn.get(self.keys.sensor_token(token))).await?;

        match id {
            Some(id) => self.sensor(&id).await,
            None => Ok(None),
        }
    }

    async fn record_reading(
        &self,
        sensor_id: &str,
        reading: &Reading,
        new_status: Option<SensorStatus>,
    ) -> StoreResult<()> {
        let doc = to_json(reading)?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        if let Some(status) = new_status {
            pipe.set(self.keys.sensor_status(sensor_id), status.as_str())
                .ignore();
        }
        pipe.rpush(self.keys.readings(), &doc)
            .ignore()
            .rpush(self.keys.sensor_readings(&reading.sensor_token), &doc)
            .ignore();

        let mut conn = self.conn.clone();
        self.run(pipe.query_async(&mut conn)).await
    }

    async fn readings(&self) -> StoreResult<Vec<Reading>> {
        self.reading_list(self.keys.readings()).await
    }

    async fn readings_for_token(&self, token: &str) -> StoreResult<Vec<Reading>> {
        self.reading_list(self.keys.sensor_readings(token)).await
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: String = self.run(redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }
}
