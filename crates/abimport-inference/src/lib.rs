//! Completion-service abstraction for abimport.
//!
//! This crate provides a unified interface for single-shot chat completions
//! across different backends:
//! - `OpenAiBackend` for OpenAI-compatible `/chat/completions` endpoints
//! - `CannedBackend` for tests and offline runs with fixed responses

mod backend;
mod error;
mod request;

pub use backend::canned::CannedBackend;
pub use backend::CompletionBackend;
pub use error::InferenceError;
pub use request::{ChatMessage, CompletionRequest, Role};

#[cfg(feature = "openai")]
pub use backend::openai::{OpenAiBackend, DEFAULT_BASE_URL};

/// Result type for completion operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
