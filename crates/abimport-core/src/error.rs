//! Error types for the abimport-core library.
//!
//! Only hard failures live here. A response that cannot be parsed, an empty
//! extraction and an incompatible template are ordinary outcomes of a run and
//! are reported through [`crate::pipeline::ImportOutcome`].

use thiserror::Error;

/// Main error type for the abimport library.
#[derive(Error, Debug)]
pub enum ImportError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Template reading or writing error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The completion service call failed.
    #[error("completion service failed: {0}")]
    Service(#[from] abimport_inference::InferenceError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to the spreadsheet template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Failed to open or decode the workbook.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The requested worksheet does not exist.
    #[error("worksheet '{0}' not found")]
    SheetNotFound(String),

    /// The workbook has no worksheets at all.
    #[error("workbook contains no worksheets")]
    NoWorksheet,

    /// The worksheet has no header row.
    #[error("worksheet '{0}' is empty (no header row)")]
    MissingHeader(String),

    /// The merged table exceeds spreadsheet limits.
    #[error("table too large: {0}")]
    TooLarge(String),

    /// Failed to serialize the merged table.
    #[error("failed to write workbook: {0}")]
    Write(String),
}

/// Result type for the abimport library.
pub type Result<T> = std::result::Result<T, ImportError>;
