// src/lib.rs

//! # thermotify
//!
//! Hospital, group and sensor registry with temperature-reading evaluation.
//! The binary in `main.rs` wires these modules together; integration tests
//! reach the store and services through this library.

pub mod api;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
