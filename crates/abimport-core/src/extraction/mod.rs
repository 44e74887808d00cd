//! Line-item extraction: request building, response cleanup and parsing.

pub mod normalize;
mod orchestrator;
pub mod prompt;
mod records;

pub use normalize::strip_code_fences;
pub use orchestrator::{LlmSettings, Orchestrator};
pub use records::{parse_line_items, ExtractionResult, ParseStage, RecoveryPolicy, SkippedRecord};
