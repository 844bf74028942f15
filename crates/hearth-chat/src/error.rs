//! Error types for the conversational front-end.
//!
//! Model failures never appear here: the router and the generators absorb
//! them. These errors only describe invalid caller input and session lookups.

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("image of {size} bytes exceeds maximum of {limit} bytes")]
    ImageTooLarge { size: usize, limit: usize },
    #[error("unsupported image format")]
    UnsupportedImage,
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("storage error: {0}")]
    StorageError(String),
}
