// src/api/mod.rs

//! # API Module
//!
//! Request handlers and the state they share.

pub mod readings;
pub mod registry;
pub mod state;
