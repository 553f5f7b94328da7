// File Path: src/services/memory_store.rs

//! In-memory [`Store`] used by the service and router tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    models::{Group, Hospital, Reading, Sensor, SensorStatus, StoreError, StoreResult},
    services::store::Store,
};

#[derive(Default)]
struct Collections {
    hospitals: Vec<Hospital>,
    groups: Vec<Group>,
    sensors: Vec<Sensor>,
    readings: Vec<Reading>,
    status_writes: HashMap<String, usize>,
}

#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<Collections>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail as if the store had gone away.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Number of cached-status writes issued for `sensor_id` by `record_reading`.
    pub fn status_writes(&self, sensor_id: &str) -> usize {
        let data = self.data.lock().unwrap();
        data.status_writes.get(sensor_id).copied().unwrap_or(0)
    }

    fn check(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::from_secs(0)));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_hospital(&self, hospital: &Hospital) -> StoreResult<()> {
        self.check()?;
        self.data.lock().unwrap().hospitals.push(hospital.clone());
        Ok(())
    }

    async fn hospital(&self, id: &str) -> StoreResult<Option<Hospital>> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data.hospitals.iter().find(|h| h.id == id).cloned())
    }

    async fn hospitals(&self) -> StoreResult<Vec<Hospital>> {
        self.check()?;
        Ok(self.data.lock().unwrap().hospitals.clone())
    }

    async fn hospital_exists(&self, id: &str) -> StoreResult<bool> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data.hospitals.iter().any(|h| h.id == id))
    }

    async fn insert_group(&self, group: &Group) -> StoreResult<()> {
        self.check()?;
        let mut data = self.data.lock().unwrap();
        if let Some(hospital) = data.hospitals.iter_mut().find(|h| h.id == group.hospital_id) {
            hospital.group_ids.push(group.id.clone());
        }
        data.groups.push(group.clone());
        Ok(())
    }

    async fn group(&self, id: &str) -> StoreResult<Option<Group>> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn groups(&self) -> StoreResult<Vec<Group>> {
        self.check()?;
        Ok(self.data.lock().unwrap().groups.clone())
    }

    async fn group_exists(&self, id: &str) -> StoreResult<bool> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data.groups.iter().any(|g| g.id == id))
    }

    async fn insert_sensor(&self, sensor: &Sensor) -> StoreResult<()> {
        self.check()?;
        let mut data = self.data.lock().unwrap();
        if let Some(group) = data.groups.iter_mut().find(|g| g.id == sensor.group_id) {
            group.sensor_ids.push(sensor.id.clone());
        }
        data.sensors.push(sensor.clone());
        Ok(())
    }

    async fn sensor(&self, id: &str) -> StoreResult<Option<Sensor>> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data.sensors.iter().find(|s| s.id == id).cloned())
    }

    async fn sensors(&self) -> StoreResult<Vec<Sensor>> {
        self.check()?;
        Ok(self.data.lock().unwrap().sensors.clone())
    }

    async fn sensor_by_token(&self, token: &str) -> StoreResult<Option<Sensor>> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data.sensors.iter().find(|s| s.token == token).cloned())
    }

    async fn record_reading(
        &self,
        sensor_id: &str,
        reading: &Reading,
        new_status: Option<SensorStatus>,
    ) -> StoreResult<()> {
        self.check()?;
        let mut data = self.data.lock().unwrap();
        if let Some(status) = new_status {
            if let Some(sensor) = data.sensors.iter_mut().find(|s| s.id == sensor_id) {
                sensor.status = status;
            }
            *data.status_writes.entry(sensor_id.to_string()).or_default() += 1;
        }
        data.readings.push(reading.clone());
        Ok(())
    }

    async fn readings(&self) -> StoreResult<Vec<Reading>> {
        self.check()?;
        Ok(self.data.lock().unwrap().readings.clone())
    }

    async fn readings_for_token(&self, token: &str) -> StoreResult<Vec<Reading>> {
        self.check()?;
        let data = self.data.lock().unwrap();
        Ok(data
            .readings
            .iter()
            .filter(|r| r.sensor_token == token)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}
