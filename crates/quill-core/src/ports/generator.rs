//! Content generation port.

use async_trait::async_trait;

use crate::domain::GenerationRequest;

/// Drafts post content for a topic through an external text-generation service.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Issue exactly one upstream call and return the first completion's text verbatim.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Content generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generator is not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Could not decode upstream response: {0}")]
    Decode(String),

    #[error("Upstream returned no completion")]
    EmptyCompletion,
}
