//! Shared types, configuration, and errors for Hearth.

pub mod config;
pub mod error;
pub mod types;

pub use config::HearthConfig;
pub use error::{HearthError, Result};
pub use types::*;
