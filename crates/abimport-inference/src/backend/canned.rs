//! Backend that answers every request with a fixed response.

use std::sync::Mutex;

use tracing::debug;

use crate::error::InferenceError;
use crate::{CompletionBackend, CompletionRequest, Result};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Status { status: u16, body: String },
}

/// Completion backend returning a configured reply.
///
/// Every request it receives is recorded so callers can inspect what would
/// have been sent to a real service.
pub struct CannedBackend {
    reply: Reply,
    received: Mutex<Vec<CompletionRequest>>,
}

impl CannedBackend {
    /// Answer every request with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(response.into()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request as if the service answered with `status`.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Status {
                status,
                body: body.into(),
            },
            received: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn received(&self) -> Vec<CompletionRequest> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl CompletionBackend for CannedBackend {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(
            "Canned completion for model {} ({} messages)",
            request.model,
            request.messages.len()
        );

        if let Ok(mut received) = self.received.lock() {
            received.push(request.clone());
        }

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status { status, body } => Err(InferenceError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "canned"
    }
}
