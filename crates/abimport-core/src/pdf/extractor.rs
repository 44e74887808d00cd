//! PDF text extraction using lopdf and pdf-extract.

use std::borrow::Cow;

use lopdf::Document;
use tracing::debug;

use super::{Result, TextExtractor};
use crate::error::PdfError;

/// Text extractor backed by lopdf (loading, decryption) and pdf-extract (text).
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new PDF text extractor.
    pub fn new() -> Self {
        Self
    }

    /// Load the document and return bytes pdf-extract can read.
    ///
    /// PDFs encrypted with an empty user password are decrypted and
    /// re-serialized; any other encryption is rejected.
    fn prepare<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }
        debug!("Loaded PDF with {} pages", page_count);

        if !doc.is_encrypted() {
            return Ok(Cow::Borrowed(data));
        }

        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
        Ok(Cow::Owned(decrypted))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String> {
        let data = self.prepare(pdf_bytes)?;
        let text = pdf_extract::extract_text_from_mem(&data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!("Extracted {} chars of text", text.len());
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "pdf-extract"
    }
}
