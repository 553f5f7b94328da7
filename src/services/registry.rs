// File Path: src/services/registry.rs

//! # Entity Registry
//!
//! Create and fetch operations for hospitals, groups and sensors.
//!
//! A child is only created under a parent that exists at the time of the
//! check. The check and the insert are separate round-trips, so a parent
//! could in principle vanish between them; nothing deletes parents today.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    models::{
        Group, Hospital, NewGroup, NewHospital, NewSensor, Sensor, SensorStatus, ServiceError,
        ServiceResult,
    },
    services::store::Store,
};

pub struct RegistryService {
    store: Arc<dyn Store>,
}

impl RegistryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_hospital(&self, input: NewHospital) -> ServiceResult<Hospital> {
        let name = required_name(input.name)?;

        let hospital = Hospital {
            id: Uuid::new_v4().to_string(),
            name,
            group_ids: Vec::new(),
        };
        self.store.insert_hospital(&hospital).await?;

        info!(hospital_id = %hospital.id, "Hospital registered");
        Ok(hospital)
    }

    #[instrument(skip(self, input))]
    pub async fn create_group(&self, hospital_id: &str, input: NewGroup) -> ServiceResult<Group> {
        let name = required_name(input.name)?;

        if !self.store.hospital_exists(hospital_id).await? {
            return Err(ServiceError::not_found("Hospital", hospital_id));
        }

        let group = Group {
            id: Uuid::new_v4().to_string(),
            hospital_id: hospital_id.to_string(),
            name,
            notify_token: input.notify_token,
            sensor_ids: Vec::new(),
        };
        self.store.insert_group(&group).await?;

        info!(group_id = %group.id, "Group registered");
        Ok(group)
    }

    #[instrument(skip(self, input))]
    pub async fn create_sensor(&self, group_id: &str, input: NewSensor) -> ServiceResult<Sensor> {
        let name = required_name(input.name)?;
        if input.min_temp >= input.max_temp {
            return Err(ServiceError::Validation(format!(
                "minTemp ({}) must be lower than maxTemp ({})",
                input.min_temp, input.max_temp
            )));
        }

        if !self.store.group_exists(group_id).await? {
            return Err(ServiceError::not_found("Group", group_id));
        }

        let sensor = Sensor {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            token: Uuid::new_v4().simple().to_string(),
            name,
            min_temp: input.min_temp,
            max_temp: input.max_temp,
            notify: input.notify,
            accept_data: input.accept_data,
            status: SensorStatus::Init,
        };
        self.store.insert_sensor(&sensor).await?;

        info!(sensor_id = %sensor.id, "Sensor registered");
        Ok(sensor)
    }

    pub async fn hospital(&self, id: &str) -> ServiceResult<Hospital> {
        self.store
            .hospital(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Hospital", id))
    }

    pub async fn hospitals(&self) -> ServiceResult<Vec<Hospital>> {
        Ok(self.store.hospitals().await?)
    }

    pub async fn group(&self, id: &str) -> ServiceResult<Group> {
        self.store
            .group(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Group", id))
    }

    pub async fn groups(&self) -> ServiceResult<Vec<Group>> {
        Ok(self.store.groups().await?)
    }

    pub async fn sensor(&self, id: &str) -> ServiceResult<Sensor> {
        self.store
            .sensor(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sensor", id))
    }

    pub async fn sensors(&self) -> ServiceResult<Vec<Sensor>> {
        Ok(self.store.sensors().await?)
    }
}

fn required_name(name: String) -> ServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("name must not be blank".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory_store::InMemoryStore;
    use pretty_assertions::assert_eq;

    fn registry() -> (Arc<InMemoryStore>, RegistryService) {
        let store = Arc::new(InMemoryStore::new());
        let registry = RegistryService::new(store.clone());
        (store, registry)
    }

    fn hospital_named(name: &str) -> NewHospital {
        NewHospital { name: name.to_string() }
    }

    fn group_named(name: &str) -> NewGroup {
        NewGroup {
            name: name.to_string(),
            notify_token: None,
        }
    }

    fn sensor_between(min_temp: f64, max_temp: f64) -> NewSensor {
        NewSensor {
            name: "vaccine fridge".to_string(),
            min_temp,
            max_temp,
            notify: true,
            accept_data: true,
        }
    }

    #[tokio::test]
    async fn created_hospital_starts_with_no_groups() {
        let (_, registry) = registry();

        let hospital = registry.create_hospital(hospital_named("St. Mary")).await.unwrap();

        assert_eq!(hospital.name, "St. Mary");
        assert!(hospital.group_ids.is_empty());
        assert_eq!(registry.hospital(&hospital.id).await.unwrap(), hospital);
    }

    #[tokio::test]
    async fn blank_hospital_name_is_rejected() {
        let (store, registry) = registry();

        let err = registry.create_hospital(hospital_named("   ")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.hospitals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn group_is_linked_to_its_hospital() {
        let (_, registry) = registry();
        let hospital = registry.create_hospital(hospital_named("St. Mary")).await.unwrap();

        let group = registry
            .create_group(
                &hospital.id,
                NewGroup {
                    name: "ICU".to_string(),
                    notify_token: Some("line-abc".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(group.hospital_id, hospital.id);
        assert_eq!(group.notify_token.as_deref(), Some("line-abc"));
        let hospital = registry.hospital(&hospital.id).await.unwrap();
        assert_eq!(hospital.group_ids, vec![group.id]);
    }

    #[tokio::test]
    async fn group_under_missing_hospital_is_not_found_and_not_created() {
        let (_, registry) = registry();

        let err = registry.create_group("nope", group_named("ICU")).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound { entity: "Hospital", .. }));
        assert!(registry.groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sensor_starts_in_init_and_is_linked_to_its_group() {
        let (_, registry) = registry();
        let hospital = registry.create_hospital(hospital_named("St. Mary")).await.unwrap();
        let group = registry.create_group(&hospital.id, group_named("ICU")).await.unwrap();

        let sensor = registry
            .create_sensor(&group.id, sensor_between(2.0, 8.0))
            .await
            .unwrap();

        assert_eq!(sensor.status, SensorStatus::Init);
        assert_eq!(sensor.group_id, group.id);
        assert!(!sensor.token.is_empty());
        assert_eq!(registry.group(&group.id).await.unwrap().sensor_ids, vec![sensor.id]);
    }

    #[tokio::test]
    async fn sensor_under_missing_group_is_not_found_and_not_created() {
        let (_, registry) = registry();

        let err = registry
            .create_sensor("nope", sensor_between(2.0, 8.0))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound { entity: "Group", .. }));
        assert!(registry.sensors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inverted_thresholds_are_rejected() {
        let (_, registry) = registry();
        let hospital = registry.create_hospital(hospital_named("St. Mary")).await.unwrap();
        let group = registry.create_group(&hospital.id, group_named("ICU")).await.unwrap();

        let err = registry
            .create_sensor(&group.id, sensor_between(30.0, 10.0))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_empty_collections_returns_empty_lists() {
        let (_, registry) = registry();

        assert!(registry.hospitals().await.unwrap().is_empty());
        assert!(registry.groups().await.unwrap().is_empty());
        assert!(registry.sensors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetching_unknown_ids_is_not_found() {
        let (_, registry) = registry();

        assert!(matches!(
            registry.hospital("x").await.unwrap_err(),
            ServiceError::NotFound { entity: "Hospital", .. }
        ));
        assert!(matches!(
            registry.sensor("x").await.unwrap_err(),
            ServiceError::NotFound { entity: "Sensor", .. }
        ));
    }

    #[tokio::test]
    async fn store_failure_propagates_as_store_error() {
        let (store, registry) = registry();
        store.go_offline();

        let err = registry.create_hospital(hospital_named("St. Mary")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
    }
}
