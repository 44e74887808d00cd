//! Core library for turning order confirmations into task-import rows.
//!
//! This crate provides:
//! - PDF text extraction
//! - Single-shot line-item extraction through a completion service
//! - Cleanup and parsing of the model's JSON answer
//! - Template column resolution, quantity normalization and row merging
//! - Spreadsheet reading and writing

pub mod error;
pub mod extraction;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod template;

pub use error::{ImportError, Result};
pub use extraction::{ExtractionResult, LlmSettings, Orchestrator, RecoveryPolicy, SkippedRecord};
pub use models::line_item::LineItemRecord;
pub use pdf::{PdfTextExtractor, TextExtractor};
pub use pipeline::{ImportOutcome, ImportPipeline, ImportReport, TemplateSource};
pub use template::{
    LogicalField, MergedTable, ResolvedColumns, SchemaIncompatible, Table, TemplateSchema,
};

/// Re-export completion types.
pub use abimport_inference::{CannedBackend, CompletionBackend, CompletionRequest, InferenceError};

#[cfg(feature = "openai")]
pub use abimport_inference::OpenAiBackend;
