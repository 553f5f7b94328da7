// src/services/mod.rs

//! # Services Module
//!
//! Business logic (registry, reading evaluation) and the store they persist through.

pub mod clock;
pub mod evaluator;
pub mod redis_service;
pub mod registry;
pub mod store;

#[cfg(test)]
pub mod memory_store;
