//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use hearth_core::config::HearthConfig;
use hearth_core::error::HearthError;

use crate::handlers;
use crate::state::AppState;

/// Room left in a request body for the JSON around a base64 image.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: allow local front-ends on the configured port and port+1.
    let port = state.config.api.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // base64 inflates uploads by 4/3.
    let body_limit = state.config.chat.max_image_bytes / 3 * 4 + BODY_OVERHEAD;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route("/sessions/{id}", delete(handlers::delete_session))
        .route("/sessions/{id}/history", get(handlers::session_history))
        .route("/sessions/{id}/analytics", get(handlers::session_analytics))
        .route("/sessions/{id}/clear", post(handlers::clear_session))
        .route("/sessions/{id}/location", put(handlers::set_location))
        .route("/resources/templates/{kind}", get(handlers::template))
        .route("/resources/legal/{state}", get(handlers::legal))
        .route("/resources/emergency", get(handlers::emergency))
        .route("/guidance/follow-up", get(handlers::follow_up))
        .route("/guidance/timeline", get(handlers::timeline))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &HearthConfig, state: AppState) -> Result<(), HearthError> {
    let addr = format!("{}:{}", config.api.host, config.api.port);

    let router = create_router(state);

    tracing::info!(%addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HearthError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| HearthError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
