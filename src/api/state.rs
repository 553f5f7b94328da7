// src/api/state.rs

//! # Application State
//!
//! Defines the shared state that will be accessible by all route handlers.

use std::sync::Arc;

use crate::services::{
    clock::Clock, evaluator::ReadingService, registry::RegistryService, store::Store,
};

/// Cloned into every handler; all members are shared handles.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub registry: Arc<RegistryService>,
    pub readings: Arc<ReadingService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        AppState {
            registry: Arc::new(RegistryService::new(store.clone())),
            readings: Arc::new(ReadingService::new(store.clone(), clock)),
            store,
        }
    }
}
