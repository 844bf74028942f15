//! Application state shared across all route handlers.
//!
//! Passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use hearth_chat::ChatOrchestrator;
use hearth_core::config::HearthConfig;
use hearth_model::ModelClient;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Session
/// state lives behind the orchestrator's own lock.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only while serving).
    pub config: Arc<HearthConfig>,
    /// Chat engine owning every session.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Name of the model backend, reported by `/health`.
    pub model_name: String,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState whose orchestrator uses `model`.
    pub fn new(config: HearthConfig, model: Arc<dyn ModelClient>) -> Self {
        let model_name = model.name().to_string();
        let orchestrator = ChatOrchestrator::new(&config, model);
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            model_name,
            start_time: Instant::now(),
        }
    }
}
