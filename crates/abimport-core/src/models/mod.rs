//! Data models and configuration.

pub mod config;
pub mod line_item;

pub use config::{AppConfig, ExtractionConfig, LlmConfig, TemplateConfig};
pub use line_item::LineItemRecord;
