//! Shared primitives: coordinate/id types, configuration, errors

pub mod config;
pub mod error;
pub mod types;
