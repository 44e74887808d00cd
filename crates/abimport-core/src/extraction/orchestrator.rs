//! Single-shot extraction request against a completion backend.

use abimport_inference::{CompletionBackend, CompletionRequest, InferenceError};
use tracing::{debug, info};

use super::prompt::SYSTEM_INSTRUCTION;
use crate::models::config::LlmConfig;

/// Model settings for the extraction request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.0,
        }
    }
}

impl From<&LlmConfig> for LlmSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

/// Sends the fixed instruction plus a document's text to the completion service.
///
/// The backend is owned by the orchestrator rather than shared globally, so
/// tests can hand in a [`abimport_inference::CannedBackend`].
pub struct Orchestrator {
    backend: Box<dyn CompletionBackend>,
    settings: LlmSettings,
}

impl Orchestrator {
    pub fn new(backend: Box<dyn CompletionBackend>, settings: LlmSettings) -> Self {
        Self { backend, settings }
    }

    /// Build the request for `document_text` without sending it.
    pub fn request_for(&self, document_text: &str) -> CompletionRequest {
        CompletionRequest::new(&self.settings.model)
            .with_system(SYSTEM_INSTRUCTION)
            .with_user(document_text)
            .with_temperature(self.settings.temperature)
    }

    /// Run one extraction and return the raw completion text.
    ///
    /// Exactly one call is made; failures are returned unchanged.
    pub fn extract(&self, document_text: &str) -> Result<String, InferenceError> {
        if document_text.trim().is_empty() {
            debug!("Document text is empty, sending request anyway");
        }
        debug!("Document text:\n{}", document_text);

        let request = self.request_for(document_text);
        info!(
            "Requesting line items from {} (model {})",
            self.backend.backend_name(),
            self.settings.model
        );

        let response = self.backend.complete(&request)?;
        debug!("Raw completion ({} chars)", response.len());
        Ok(response)
    }
}
