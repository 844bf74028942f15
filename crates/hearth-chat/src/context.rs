//! Routing context: a bounded, read-only view of recent turns.
//!
//! The context is never stored on its own; it is sliced from a session's
//! log right before a turn is routed and serialized into model prompts.

use serde::Serialize;

use hearth_core::{Handler, Role, Turn};

/// One entry of the routing context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextTurn {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<Handler>,
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_image: bool,
}

/// Snapshot of the most recent turns of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutingContext {
    pub turns: Vec<ContextTurn>,
}

impl RoutingContext {
    /// An empty context.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from the last `limit` turns of `log`.
    ///
    /// The synthetic welcome turn carries no information about the user's
    /// request and is skipped.
    pub fn from_turns(log: &[Turn], limit: usize) -> Self {
        let relevant: Vec<&Turn> = log.iter().filter(|t| !t.is_greeting()).collect();
        let start = relevant.len().saturating_sub(limit);
        let turns = relevant[start..]
            .iter()
            .map(|t| ContextTurn {
                role: t.role(),
                handler: t.handler(),
                text: t.text.clone(),
                has_image: t.has_image,
            })
            .collect();
        Self { turns }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// JSON form embedded in prompts; `None` when there is nothing to embed.
    pub fn to_prompt_json(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        serde_json::to_string(&self.turns).ok()
    }
}
