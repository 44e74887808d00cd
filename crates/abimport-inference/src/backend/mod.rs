//! Completion backend implementations.

pub mod canned;

#[cfg(feature = "openai")]
pub mod openai;

use crate::{CompletionRequest, Result};

/// Trait for completion services.
///
/// One call produces one completion. Implementations do not retry; a
/// transport or service failure is returned to the caller as-is.
pub trait CompletionBackend: Send + Sync {
    /// Run the request and return the completion text.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

impl<T: CompletionBackend + ?Sized> CompletionBackend for std::sync::Arc<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        (**self).complete(request)
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }
}
