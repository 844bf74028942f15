//! Error types for model calls.

/// Any failure of a model call: transport, HTTP status, or unusable reply.
///
/// Callers treat every variant the same way (fallback path); the variants
/// exist for logging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("model is not configured: {0}")]
    NotConfigured(String),
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        retryable: bool,
    },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

impl ModelError {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Status { retryable, .. } => *retryable,
            ModelError::Request(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ModelError::InvalidResponse(err.to_string())
        } else {
            ModelError::Request(err.to_string())
        }
    }
}
