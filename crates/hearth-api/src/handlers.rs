//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path/query/body data via axum extractors, calls
//! into the chat engine held by AppState, and returns JSON responses.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hearth_chat::orchestrator::SessionSummary;
use hearth_chat::resources::find_template;
use hearth_chat::{
    document_template, emergency_resources, estimate_repair_timeline, follow_up_questions,
    legal_resources, ChatOutcome, ConversationSummary, IncomingMessage, Session, SessionStats,
};
use hearth_core::Turn;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<Uuid>,
    /// Image bytes as base64; a `data:<mime>;base64,` prefix is accepted.
    pub image_base64: Option<String>,
    pub image_name: Option<String>,
}

/// Optional request body for POST /sessions.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub location: Option<String>,
}

/// Request body for PUT /sessions/{id}/location.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmergencyParams {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuidanceParams {
    pub issue_type: Option<String>,
    pub severity: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub model: String,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub session_id: Uuid,
    pub summary: ConversationSummary,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct SessionActionResponse {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub session_id: Uuid,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FollowUpResponse {
    pub issue_type: String,
    pub severity: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub issue_type: String,
    pub severity: String,
    pub timeline: String,
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_sessions = match state.orchestrator.list_sessions() {
        Ok(sessions) => sessions.len(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to count sessions");
            0
        }
    };
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        model: state.model_name.clone(),
        active_sessions,
    })
}

// =============================================================================
// Chat
// =============================================================================

/// POST /chat - route a message and return the assistant reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatOutcome>, ApiError> {
    let mut message = IncomingMessage::text(body.message);
    if let Some(encoded) = body.image_base64.as_deref().filter(|s| !s.trim().is_empty()) {
        let bytes = decode_image(encoded)?;
        message = message.with_image_bytes(bytes, body.image_name)?;
    }

    let outcome = state
        .orchestrator
        .handle_message(body.session_id, message)
        .await?;
    Ok(Json(outcome))
}

fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let data = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    STANDARD
        .decode(data.trim())
        .map_err(|e| ApiError::BadRequest(format!("invalid base64 image data: {}", e)))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /sessions - body is optional.
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice::<CreateSessionRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid session body: {}", e)))?
    };
    let session = state.orchestrator.create_session(request.location)?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionsResponse>, ApiError> {
    Ok(Json(SessionsResponse {
        sessions: state.orchestrator.list_sessions()?,
    }))
}

/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orchestrator.delete_session(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/{id}/history
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let turns = state.orchestrator.history(id)?;
    Ok(Json(HistoryResponse {
        session_id: id,
        turns,
    }))
}

/// GET /sessions/{id}/analytics
pub async fn session_analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let summary = state.orchestrator.summarize(id)?;
    let stats = state.orchestrator.stats(id)?;
    Ok(Json(AnalyticsResponse {
        session_id: id,
        summary,
        stats,
    }))
}

/// POST /sessions/{id}/clear
pub async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionActionResponse>, ApiError> {
    state.orchestrator.clear_session(id)?;
    Ok(Json(SessionActionResponse {
        session_id: id,
        message: "Conversation cleared".to_string(),
    }))
}

/// PUT /sessions/{id}/location
pub async fn set_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<LocationRequest>,
) -> Result<Json<LocationResponse>, ApiError> {
    state.orchestrator.set_location(id, body.location)?;
    let location = state.orchestrator.get_session(id)?.and_then(|s| s.location);
    Ok(Json(LocationResponse {
        session_id: id,
        location,
    }))
}

// =============================================================================
// Resources
// =============================================================================

/// GET /resources/templates/{kind}
pub async fn template(Path(kind): Path<String>) -> Result<Json<ResourceResponse>, ApiError> {
    match find_template(&kind) {
        Some(content) => Ok(Json(ResourceResponse {
            content: content.to_string(),
        })),
        None => Err(ApiError::NotFound(document_template(&kind))),
    }
}

/// GET /resources/legal/{state}
pub async fn legal(Path(state_name): Path<String>) -> Json<ResourceResponse> {
    Json(ResourceResponse {
        content: legal_resources(&state_name),
    })
}

/// GET /resources/emergency?location=
pub async fn emergency(Query(params): Query<EmergencyParams>) -> Json<ResourceResponse> {
    Json(ResourceResponse {
        content: emergency_resources(params.location.as_deref()),
    })
}

// =============================================================================
// Guidance
// =============================================================================

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing required parameter '{}'", name)))
}

/// GET /guidance/follow-up?issue_type=&severity=
pub async fn follow_up(
    Query(params): Query<GuidanceParams>,
) -> Result<Json<FollowUpResponse>, ApiError> {
    let issue_type = required(params.issue_type, "issue_type")?;
    let severity = required(params.severity, "severity")?;
    let questions = follow_up_questions(&issue_type, &severity);
    Ok(Json(FollowUpResponse {
        issue_type,
        severity,
        questions,
    }))
}

/// GET /guidance/timeline?issue_type=&severity=
pub async fn timeline(
    Query(params): Query<GuidanceParams>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let issue_type = required(params.issue_type, "issue_type")?;
    let severity = required(params.severity, "severity")?;
    let timeline = estimate_repair_timeline(&issue_type, &severity).to_string();
    Ok(Json(TimelineResponse {
        issue_type,
        severity,
        timeline,
    }))
}
