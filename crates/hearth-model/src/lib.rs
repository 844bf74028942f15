//! Language model access for Hearth.
//!
//! Defines the [`ModelClient`] capability consumed by the router and the
//! response generators, with a Gemini REST implementation, a disabled
//! client for keyless operation, and a scripted mock for tests.

pub mod client;
pub mod error;
pub mod gemini;
pub mod mock;

pub use client::{DisabledModel, ModelClient};
pub use error::ModelError;
pub use gemini::GeminiClient;
pub use mock::MockModel;
