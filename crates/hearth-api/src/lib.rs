//! Hearth API crate - axum HTTP server and route handlers.
//!
//! Exposes the chat engine over JSON: sessions, message handling,
//! conversation analytics, and the static tenant resources and repair
//! guidance.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
