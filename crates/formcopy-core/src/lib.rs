//! Core library for copying fillable PDF form fields between documents.
//!
//! This crate provides:
//! - Field extraction from AcroForm trees or page widgets
//! - Bracket-tolerant field-name matching
//! - Allow-list selection, in memory or from JSON checkpoints
//! - Writing selected values into a destination form

pub mod discover;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod matcher;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod select;
pub mod store;

pub use error::{FormCopyError, Result};
pub use models::config::{
    ExtractionStrategy, PipelineMode, SelectionStrategy, TransferConfig,
};
pub use models::fields::{AllowList, FieldValues, NOT_AVAILABLE};
pub use pdf::{AcroFormSource, AcroFormWriter, FieldSink, FieldSource, WidgetSource, WriteReport};
pub use pipeline::{Pipeline, Stage, TransferReport};
pub use select::{DirectSelector, FieldSelector, PatternSelector, Selection};
