use thiserror::Error;

/// Top-level error type for the Hearth system.
///
/// Subsystem crates define their own error types; this one covers the
/// configuration and I/O concerns shared by the composition root.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HearthError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for HearthError {
    fn from(err: toml::de::Error) -> Self {
        HearthError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HearthError {
    fn from(err: toml::ser::Error) -> Self {
        HearthError::Config(err.to_string())
    }
}

/// A specialized `Result` type for Hearth operations.
pub type Result<T> = std::result::Result<T, HearthError>;
