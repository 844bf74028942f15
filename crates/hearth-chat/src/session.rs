//! Conversation sessions and their append-only logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use hearth_core::{Handler, Turn};

/// Ordered, append-only record of a conversation's turns.
///
/// Timestamps never decrease: a turn stamped earlier than its predecessor
/// (clock skew) is clamped to the predecessor's time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log holding only the welcome turn.
    pub fn with_welcome() -> Self {
        let mut log = Self::new();
        log.append(Turn::welcome());
        log
    }

    pub fn append(&mut self, mut turn: Turn) {
        if let Some(last) = self.turns.last() {
            if turn.created_at < last.created_at {
                turn.created_at = last.created_at;
            }
        }
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// One user's conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub log: ConversationLog,
    /// Handler that produced the latest assistant turn.
    pub current_handler: Handler,
    /// Free-text location used to scope tenancy answers.
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(location: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            log: ConversationLog::with_welcome(),
            current_handler: Handler::Clarify,
            location: normalize_location(location),
            created_at: Utc::now(),
        }
    }

    /// Start the conversation over. The location survives.
    pub fn clear(&mut self) {
        self.log = ConversationLog::with_welcome();
        self.current_handler = Handler::Clarify;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = normalize_location(location);
    }
}

/// Trim a location; blank means unset.
pub fn normalize_location(location: Option<String>) -> Option<String> {
    location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}
