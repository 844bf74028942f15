//! Integration tests for the Hearth API.
//!
//! Each test builds its own router over a fresh AppState backed by a
//! scripted `MockModel`, so routing and replies are deterministic.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use hearth_api::create_router;
use hearth_api::handlers::HealthResponse;
use hearth_api::state::AppState;
use hearth_core::config::HearthConfig;
use hearth_model::MockModel;

// =============================================================================
// Helpers
// =============================================================================

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn make_state_with(model: MockModel, config: HearthConfig) -> AppState {
    AppState::new(config, Arc::new(model))
}

fn make_state(model: MockModel) -> AppState {
    make_state_with(model, HearthConfig::default())
}

/// Router whose model is down: keyword routing and apologies only.
fn make_app() -> axum::Router {
    create_router(make_state(MockModel::failing()))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn put_json(uri: &str, json: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

fn png_base64(extra: usize) -> String {
    let mut bytes = PNG_HEADER.to_vec();
    bytes.extend(std::iter::repeat(0u8).take(extra));
    STANDARD.encode(bytes)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let app = make_app();
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.model, "mock");
    assert_eq!(health.active_sessions, 0);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_creates_session_and_routes_by_keywords() {
    let state = make_state(MockModel::failing());
    let app = create_router(state.clone());

    let resp = app
        .oneshot(post_json(
            "/chat",
            &json!({"message": "Can my landlord keep my deposit?"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["handler"], "tenancy");
    assert_eq!(body["confidence"], 0.0);
    assert_eq!(
        body["reply"],
        "Sorry, I couldn't process your request at the moment. Please try again later."
    );
    let sid: Uuid = serde_json::from_value(body["session_id"].clone()).unwrap();
    assert_eq!(state.orchestrator.history(sid).unwrap().len(), 3);
}

#[tokio::test]
async fn test_chat_model_reply() {
    let model = MockModel::replying("Landlords must return deposits within 21 days.")
        .then_reply("tenancy");
    let app = create_router(make_state(model));

    let resp = app
        .oneshot(post_json("/chat", &json!({"message": "deposit timing?"})))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["handler"], "tenancy");
    assert_eq!(body["reply"], "Landlords must return deposits within 21 days.");
    assert!(body["explanation"]
        .as_str()
        .unwrap()
        .contains("Tenancy FAQ Agent"));
}

#[tokio::test]
async fn test_chat_image_only_routes_to_issue() {
    let app = create_router(make_state(MockModel::replying("Mold on drywall.")));

    let resp = app
        .oneshot(post_json(
            "/chat",
            &json!({"image_base64": png_base64(16), "image_name": "wall.png"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["handler"], "issue");
    assert_eq!(body["reply"], "Mold on drywall.");
    assert!(body["explanation"]
        .as_str()
        .unwrap()
        .contains("image upload"));
}

#[tokio::test]
async fn test_chat_accepts_data_url_prefix() {
    let app = create_router(make_state(MockModel::replying("ok")));
    let data_url = format!("data:image/png;base64,{}", png_base64(4));
    let resp = app
        .oneshot(post_json("/chat", &json!({"message": "see", "image_base64": data_url})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_empty_message_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/chat", &json!({"message": "   "})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "message cannot be empty");
}

#[tokio::test]
async fn test_chat_message_too_long_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/chat", &json!({"message": "a".repeat(2001)})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_invalid_base64_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            "/chat",
            &json!({"message": "look", "image_base64": "!!!not base64!!!"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_unsupported_image_422() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            "/chat",
            &json!({"message": "look", "image_base64": STANDARD.encode(b"plain text file")}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "unprocessable_entity");
}

#[tokio::test]
async fn test_chat_image_too_large_413() {
    let mut config = HearthConfig::default();
    config.chat.max_image_bytes = 32;
    let app = create_router(make_state_with(MockModel::replying("ok"), config));

    let resp = app
        .oneshot(post_json("/chat", &json!({"image_base64": png_base64(64)})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "payload_too_large");
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_create_and_list_sessions() {
    let state = make_state(MockModel::failing());

    let resp = create_router(state.clone())
        .oneshot(post_json("/sessions", &json!({"location": "Austin, Texas"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["location"], "Austin, Texas");
    assert_eq!(created["current_handler"], "clarify");
    assert_eq!(created["log"].as_array().unwrap().len(), 1);

    let resp = create_router(state.clone())
        .oneshot(post_empty("/sessions"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = create_router(state)
        .oneshot(get("/sessions"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_session_bad_body_400() {
    let app = make_app();
    let resp = app
        .oneshot(
            Request::post("/sessions")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_session() {
    let state = make_state(MockModel::failing());
    let session = state.orchestrator.create_session(None).unwrap();

    let resp = create_router(state.clone())
        .oneshot(delete(&format!("/sessions/{}", session.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = create_router(state)
        .oneshot(delete(&format!("/sessions/{}", session.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_and_analytics() {
    let state = make_state(MockModel::failing());
    let outcome = state
        .orchestrator
        .handle_message(None, hearth_chat::IncomingMessage::text("broken window and a leak"))
        .await
        .unwrap();
    let sid = outcome.session_id;

    let resp = create_router(state.clone())
        .oneshot(get(&format!("/sessions/{}/history", sid)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let turns = body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1]["role"], "user");
    assert!(turns[1].get("handler").is_none());
    assert_eq!(turns[2]["role"], "assistant");
    assert_eq!(turns[2]["handler"], "issue");

    let resp = create_router(state)
        .oneshot(get(&format!("/sessions/{}/analytics", sid)))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["summary"]["total"], 3);
    assert_eq!(body["summary"]["usage"]["issue"], 1);
    assert_eq!(body["summary"]["flavor"], "issue_focused");
    assert_eq!(body["stats"]["user_messages"], 1);
}

#[tokio::test]
async fn test_unknown_session_404() {
    let app = make_app();
    let resp = app
        .oneshot(get(&format!("/sessions/{}/history", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_clear_session_keeps_location() {
    let state = make_state(MockModel::failing());
    let session = state
        .orchestrator
        .create_session(Some("Seattle".to_string()))
        .unwrap();
    state
        .orchestrator
        .handle_message(Some(session.id), hearth_chat::IncomingMessage::text("hi"))
        .await
        .unwrap();

    let resp = create_router(state.clone())
        .oneshot(post_empty(&format!("/sessions/{}/clear", session.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = state.orchestrator.get_session(session.id).unwrap().unwrap();
    assert_eq!(stored.log.len(), 1);
    assert_eq!(stored.location.as_deref(), Some("Seattle"));
}

#[tokio::test]
async fn test_set_location() {
    let state = make_state(MockModel::failing());
    let session = state.orchestrator.create_session(None).unwrap();

    let resp = create_router(state.clone())
        .oneshot(put_json(
            &format!("/sessions/{}/location", session.id),
            &json!({"location": "  Miami, Florida "}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["location"], "Miami, Florida");

    let resp = create_router(state)
        .oneshot(put_json(
            &format!("/sessions/{}/location", session.id),
            &json!({"location": null}),
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["location"].is_null());
}

// =============================================================================
// Resources and guidance
// =============================================================================

#[tokio::test]
async fn test_template_found_and_missing() {
    let resp = make_app()
        .oneshot(get("/resources/templates/notice_to_vacate"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["content"]
        .as_str()
        .unwrap()
        .contains("Notice to Vacate Template"));

    let resp = make_app()
        .oneshot(get("/resources/templates/lease_renewal"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Template not found."));
}

#[tokio::test]
async fn test_legal_resources() {
    let resp = make_app()
        .oneshot(get("/resources/legal/California"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["content"].as_str().unwrap().contains("Tenants Together"));
}

#[tokio::test]
async fn test_emergency_resources() {
    let resp = make_app()
        .oneshot(get("/resources/emergency?location=Boston"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["content"]
        .as_str()
        .unwrap()
        .contains("**Boston-Specific Resources:**"));

    let resp = make_app()
        .oneshot(get("/resources/emergency"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["content"]
        .as_str()
        .unwrap()
        .contains("How to Find Local Help"));
}

#[tokio::test]
async fn test_follow_up_questions_endpoint() {
    let resp = make_app()
        .oneshot(get(
            "/guidance/follow-up?issue_type=water_damage&severity=severe",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["questions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_guidance_missing_param_400() {
    let resp = make_app()
        .oneshot(get("/guidance/timeline?issue_type=mold_growth"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_timeline_endpoint() {
    let resp = make_app()
        .oneshot(get("/guidance/timeline?issue_type=mold_growth&severity=moderate"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["timeline"], "1-2 weeks");

    let resp = make_app()
        .oneshot(get("/guidance/timeline?issue_type=unknown&severity=minor"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["timeline"], "Timeline varies - consult professional");
}
