//! Shared test utilities used across ctw crates.

pub mod table;
pub mod tracing;
