//! Conversation analytics: handler usage and session statistics.

use serde::{Deserialize, Serialize};

use hearth_core::{Author, Handler, Role, Turn};

/// Assistant turns per handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerUsage {
    pub clarify: u32,
    pub issue: u32,
    pub tenancy: u32,
}

impl HandlerUsage {
    pub fn get(&self, handler: Handler) -> u32 {
        match handler {
            Handler::Clarify => self.clarify,
            Handler::Issue => self.issue,
            Handler::Tenancy => self.tenancy,
        }
    }

    fn bump(&mut self, handler: Handler) {
        match handler {
            Handler::Clarify => self.clarify += 1,
            Handler::Issue => self.issue += 1,
            Handler::Tenancy => self.tenancy += 1,
        }
    }
}

/// Overall character of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationFlavor {
    IssueFocused,
    TenancyFocused,
    Mixed,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub usage: HandlerUsage,
    /// Turns of every role.
    pub total: usize,
    /// Most used handler; ties go to the earliest in [`Handler::ALL`].
    pub dominant: Option<Handler>,
    pub flavor: ConversationFlavor,
}

/// Summarize which handlers answered a conversation.
pub fn summarize(turns: &[Turn]) -> ConversationSummary {
    let mut usage = HandlerUsage::default();
    for turn in turns {
        if let Some(handler) = turn.handler() {
            usage.bump(handler);
        }
    }

    if turns.is_empty() {
        return ConversationSummary {
            usage,
            total: 0,
            dominant: None,
            flavor: ConversationFlavor::Empty,
        };
    }

    let mut dominant = Handler::ALL[0];
    for handler in Handler::ALL {
        if usage.get(handler) > usage.get(dominant) {
            dominant = handler;
        }
    }

    let flavor = if usage.issue > usage.tenancy {
        ConversationFlavor::IssueFocused
    } else if usage.tenancy > usage.issue {
        ConversationFlavor::TenancyFocused
    } else {
        ConversationFlavor::Mixed
    };

    ConversationSummary {
        usage,
        total: turns.len(),
        dominant: Some(dominant),
        flavor,
    }
}

/// Per-session counters shown alongside the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub images_uploaded: usize,
    /// Mean confidence of assistant turns that carry one.
    pub average_confidence: Option<f32>,
}

/// Message counts for a conversation. The welcome turn is not counted.
pub fn session_stats(turns: &[Turn]) -> SessionStats {
    let turns: Vec<&Turn> = turns.iter().filter(|t| !t.is_greeting()).collect();
    let user_messages = turns.iter().filter(|t| t.role() == Role::User).count();
    let images_uploaded = turns
        .iter()
        .filter(|t| t.role() == Role::User && t.has_image)
        .count();

    let confidences: Vec<f32> = turns
        .iter()
        .filter_map(|t| match t.author {
            Author::Assistant { confidence, .. } => confidence,
            Author::User => None,
        })
        .collect();
    let average_confidence = if confidences.is_empty() {
        None
    } else {
        Some(confidences.iter().sum::<f32>() / confidences.len() as f32)
    };

    SessionStats {
        total_messages: turns.len(),
        user_messages,
        assistant_messages: turns.len() - user_messages,
        images_uploaded,
        average_confidence,
    }
}
