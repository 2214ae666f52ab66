//! Configuration and field data models.

pub mod config;
pub mod fields;
