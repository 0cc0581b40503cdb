//! CTW meta-variable generator core library.
//!
//! Synthesises the seven meta variables describing cable-tree-wiring
//! instances through a chain of conditional sampling stages.

mod builder;
pub mod distributions;
mod error;
mod generator;
pub mod invariants;
pub mod limits;
mod record;
pub mod rules;
pub mod sampling;
pub mod seed;
mod table;
mod validate;

pub use crate::{
    builder::{CapacityPolicy, DEFAULT_RECORD_COUNT, ExecutionStrategy, GeneratorBuilder},
    error::{
        GenerationError, GenerationErrorCode, RejectionReason, RejectionReasonCode, Result,
        ValidationError, ValidationErrorCode, ValidationReport,
    },
    generator::{GeneratedBatch, Generator},
    record::{COLUMNS, MetaVariableRecord},
    table::{SEPARATOR, write_table},
    validate::{FixedValues, Overrides},
};
