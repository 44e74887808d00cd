//! PDF processing module.

mod extractor;

pub use extractor::PdfTextExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for document text extraction backends.
///
/// The whole document comes back as one string, pages concatenated in order.
/// No layout or coordinate information is kept.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page from PDF bytes.
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
