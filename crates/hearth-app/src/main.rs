//! Hearth application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Build the model client (Gemini, or disabled without an API key)
//! 4. Serve the HTTP API or run the interactive terminal chat

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hearth_api::routes;
use hearth_api::state::AppState;
use hearth_chat::ChatOrchestrator;
use hearth_core::config::HearthConfig;
use hearth_model::{DisabledModel, GeminiClient, ModelClient};

use cli::{CliArgs, Command};

/// Pick the model backend from configuration.
///
/// Without a usable API key the assistant still runs: routing falls back
/// to keywords and model-backed replies become apologies.
fn build_model(config: &HearthConfig) -> Arc<dyn ModelClient> {
    let Some(api_key) = config.model.resolve_api_key() else {
        tracing::warn!(
            "No Gemini API key configured (set GEMINI_API_KEY); model calls are disabled"
        );
        return Arc::new(DisabledModel);
    };
    match GeminiClient::new(&config.model, api_key) {
        Ok(client) => {
            tracing::info!(
                text_model = %config.model.text_model,
                vision_model = %config.model.vision_model,
                "Gemini client ready"
            );
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build Gemini client; model calls are disabled");
            Arc::new(DisabledModel)
        }
    }
}

fn init_tracing(args: &CliArgs, config: &HearthConfig) {
    let filter = match args.resolve_log_level() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing exists, so its outcome is logged after.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = match HearthConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (HearthConfig::default(), Some(e)),
    };

    init_tracing(&args, &config);
    tracing::info!("Starting Hearth v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    let model = build_model(&config);

    match args.command {
        Command::Serve { .. } => {
            config.api.port = args.resolve_port(config.api.port);
            let state = AppState::new(config.clone(), model);
            routes::start_server(&config, state).await?;
        }
        Command::Chat { ref location } => {
            let orchestrator = ChatOrchestrator::new(&config, model);
            repl::run(&orchestrator, location.clone()).await?;
        }
    }

    Ok(())
}
