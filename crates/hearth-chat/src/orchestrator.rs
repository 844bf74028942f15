//! Chat orchestrator: central coordinator wiring router, generators and sessions.
//!
//! Manages sessions, routes each message to a handler, stores both turns and
//! returns the assistant reply. The session map lock is never held across a
//! model call; turns on one session are serialized by a per-session turn lock
//! held for the whole exchange.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex as TurnLock;
use uuid::Uuid;

use hearth_core::config::{ChatConfig, HearthConfig};
use hearth_core::{Handler, ImageAttachment, Turn};
use hearth_model::ModelClient;

use crate::analytics::{self, ConversationSummary, SessionStats};
use crate::context::RoutingContext;
use crate::error::ChatError;
use crate::generator::{Clarifier, IssueGenerator, Responder, TenancyGenerator, TurnRequest};
use crate::keywords::KeywordScorer;
use crate::router::Router;
use crate::session::{normalize_location, Session};

/// A user message as received from a front-end.
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub text: String,
    pub image: Option<ImageAttachment>,
}

impl IncomingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    /// Attach raw upload bytes, detecting the image format.
    pub fn with_image_bytes(self, bytes: Vec<u8>, name: Option<String>) -> Result<Self, ChatError> {
        let image = ImageAttachment::sniff(bytes, name).ok_or(ChatError::UnsupportedImage)?;
        Ok(self.with_image(image))
    }
}

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatOutcome {
    pub session_id: Uuid,
    pub handler: Handler,
    pub reply: String,
    pub confidence: f32,
    /// Why the message went to `handler`.
    pub explanation: String,
}

/// Lightweight listing entry for a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub current_handler: Handler,
    pub location: Option<String>,
}

impl From<&Session> for SessionSummary {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id,
            created_at: s.created_at,
            message_count: s.log.len(),
            current_handler: s.current_handler,
            location: s.location.clone(),
        }
    }
}

/// Central chat orchestrator.
pub struct ChatOrchestrator {
    router: Router,
    issue: IssueGenerator,
    tenancy: TenancyGenerator,
    clarifier: Clarifier,
    sessions: Mutex<HashMap<Uuid, Session>>,
    turn_locks: Mutex<HashMap<Uuid, Arc<TurnLock<()>>>>,
    config: ChatConfig,
    default_location: Option<String>,
}

impl ChatOrchestrator {
    /// Create an orchestrator whose router and generators share `model`.
    pub fn new(config: &HearthConfig, model: Arc<dyn ModelClient>) -> Self {
        let scorer = KeywordScorer::new(&config.routing);
        Self {
            router: Router::new(Arc::clone(&model), scorer),
            issue: IssueGenerator::new(Arc::clone(&model)),
            tenancy: TenancyGenerator::new(model),
            clarifier: Clarifier::new(config.chat.clarify_selection),
            sessions: Mutex::new(HashMap::new()),
            turn_locks: Mutex::new(HashMap::new()),
            config: config.chat.clone(),
            default_location: normalize_location(config.general.location.clone()),
        }
    }

    /// Handle an incoming message.
    ///
    /// An unknown or missing `session_id` starts a new session; the returned
    /// outcome carries the id actually used.
    pub async fn handle_message(
        &self,
        session_id: Option<Uuid>,
        message: IncomingMessage,
    ) -> Result<ChatOutcome, ChatError> {
        self.validate(&message)?;

        let text = message.text.trim().to_string();
        let image = message.image;
        let has_image = image.is_some();

        let sid = {
            let mut sessions = self.lock_sessions()?;
            self.resolve_session(&mut sessions, session_id)
        };
        let turn_lock = self.turn_lock(sid)?;
        let _turn = turn_lock.lock().await;

        // Snapshot context before the user turn lands; the text travels on its own.
        let (location, context) = {
            let mut sessions = self.lock_sessions()?;
            let session = sessions
                .get_mut(&sid)
                .ok_or(ChatError::SessionNotFound(sid))?;

            let context =
                RoutingContext::from_turns(session.log.turns(), self.config.context_turns);
            let location = session.location.clone();

            let mut turn = Turn::user(text.clone());
            if let Some(ref img) = image {
                turn = turn.with_image(img.name.clone());
            }
            session.log.append(turn);
            (location, context)
        };

        let handler = self.router.decide(&text, has_image, &context).await;
        tracing::info!(session_id = %sid, %handler, has_image, "Routed message");

        let request = TurnRequest::new(&text, &context)
            .with_image(image.as_ref())
            .with_location(location.as_deref());
        let reply = self.responder(handler).respond(&request).await;
        let explanation = self.router.explain(handler, has_image);

        {
            let mut sessions = self.lock_sessions()?;
            match sessions.get_mut(&sid) {
                Some(session) => {
                    session.current_handler = handler;
                    session
                        .log
                        .append(Turn::assistant(reply.text.clone(), handler, reply.confidence));
                }
                None => {
                    tracing::warn!(
                        session_id = %sid,
                        "Session removed while a reply was generated"
                    );
                }
            }
        }

        Ok(ChatOutcome {
            session_id: sid,
            handler,
            reply: reply.text,
            confidence: reply.confidence,
            explanation,
        })
    }

    /// Start a new session. `None` falls back to the configured default location.
    pub fn create_session(&self, location: Option<String>) -> Result<Session, ChatError> {
        let location = normalize_location(location).or_else(|| self.default_location.clone());
        let session = Session::new(location);
        let mut sessions = self.lock_sessions()?;
        sessions.insert(session.id, session.clone());
        tracing::debug!(session_id = %session.id, "Created session");
        Ok(session)
    }

    pub fn get_session(&self, session_id: Uuid) -> Result<Option<Session>, ChatError> {
        let sessions = self.lock_sessions()?;
        Ok(sessions.get(&session_id).cloned())
    }

    /// List all sessions, oldest first.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>, ChatError> {
        let sessions = self.lock_sessions()?;
        let mut list: Vec<SessionSummary> = sessions.values().map(SessionSummary::from).collect();
        list.sort_by_key(|s| s.created_at);
        Ok(list)
    }

    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self.lock_sessions()?;
        sessions
            .remove(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        drop(sessions);
        self.lock_turn_locks()?.remove(&session_id);
        Ok(())
    }

    /// Reset a session's log to the welcome turn.
    pub fn clear_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        self.with_session_mut(session_id, Session::clear)
    }

    pub fn set_location(
        &self,
        session_id: Uuid,
        location: Option<String>,
    ) -> Result<(), ChatError> {
        self.with_session_mut(session_id, |s| s.set_location(location))
    }

    pub fn history(&self, session_id: Uuid) -> Result<Vec<Turn>, ChatError> {
        self.with_session(session_id, |s| s.log.turns().to_vec())
    }

    pub fn summarize(&self, session_id: Uuid) -> Result<ConversationSummary, ChatError> {
        self.with_session(session_id, |s| analytics::summarize(s.log.turns()))
    }

    pub fn stats(&self, session_id: Uuid) -> Result<SessionStats, ChatError> {
        self.with_session(session_id, |s| analytics::session_stats(s.log.turns()))
    }

    // -- Private helpers --

    fn validate(&self, message: &IncomingMessage) -> Result<(), ChatError> {
        if message.text.trim().is_empty() && message.image.is_none() {
            return Err(ChatError::EmptyMessage);
        }
        if message.text.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }
        if let Some(ref image) = message.image {
            if image.len() > self.config.max_image_bytes {
                return Err(ChatError::ImageTooLarge {
                    size: image.len(),
                    limit: self.config.max_image_bytes,
                });
            }
        }
        Ok(())
    }

    fn responder(&self, handler: Handler) -> &dyn Responder {
        match handler {
            Handler::Clarify => &self.clarifier,
            Handler::Issue => &self.issue,
            Handler::Tenancy => &self.tenancy,
        }
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::StorageError(format!("session lock poisoned: {}", e)))
    }

    fn lock_turn_locks(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<Uuid, Arc<TurnLock<()>>>>, ChatError> {
        self.turn_locks
            .lock()
            .map_err(|e| ChatError::StorageError(format!("turn lock map poisoned: {}", e)))
    }

    /// The lock a turn on `session_id` holds from user turn to reply.
    fn turn_lock(&self, session_id: Uuid) -> Result<Arc<TurnLock<()>>, ChatError> {
        let mut locks = self.lock_turn_locks()?;
        Ok(Arc::clone(locks.entry(session_id).or_default()))
    }

    /// Resolve the requested session or create a new one.
    fn resolve_session(
        &self,
        sessions: &mut HashMap<Uuid, Session>,
        requested: Option<Uuid>,
    ) -> Uuid {
        if let Some(sid) = requested {
            if sessions.contains_key(&sid) {
                return sid;
            }
            tracing::debug!(session_id = %sid, "Unknown session requested, starting a new one");
        }
        let session = Session::new(self.default_location.clone());
        let sid = session.id;
        sessions.insert(sid, session);
        sid
    }

    fn with_session<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&Session) -> T,
    ) -> Result<T, ChatError> {
        let sessions = self.lock_sessions()?;
        sessions
            .get(&session_id)
            .map(f)
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    fn with_session_mut<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, ChatError> {
        let mut sessions = self.lock_sessions()?;
        sessions
            .get_mut(&session_id)
            .map(f)
            .ok_or(ChatError::SessionNotFound(session_id))
    }
}

// =============================================================================
// Tests
// =============================================================================
