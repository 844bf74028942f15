//! Response generators and the trait they share.
//!
//! Each generator owns one [`Handler`]. Generators never return errors:
//! a failed model call is logged and answered with [`APOLOGY`] at
//! confidence 0.0.

pub mod clarifier;
pub mod issue;
pub mod tenancy;

use async_trait::async_trait;

use hearth_core::{Handler, ImageAttachment};

use crate::context::RoutingContext;

pub use clarifier::{Clarifier, CLARIFY_PROMPTS};
pub use issue::IssueGenerator;
pub use tenancy::TenancyGenerator;

/// Reply sent when the model could not produce an answer.
pub const APOLOGY: &str =
    "Sorry, I couldn't process your request at the moment. Please try again later.";

/// Everything a generator needs to answer one turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub text: &'a str,
    pub image: Option<&'a ImageAttachment>,
    pub location: Option<&'a str>,
    pub context: &'a RoutingContext,
}

impl<'a> TurnRequest<'a> {
    pub fn new(text: &'a str, context: &'a RoutingContext) -> Self {
        Self {
            text,
            image: None,
            location: None,
            context,
        }
    }

    pub fn with_image(mut self, image: Option<&'a ImageAttachment>) -> Self {
        self.image = image;
        self
    }

    pub fn with_location(mut self, location: Option<&'a str>) -> Self {
        self.location = location;
        self
    }
}

/// A generated reply and the confidence attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub confidence: f32,
}

impl Reply {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    pub fn apology() -> Self {
        Self::new(APOLOGY, 0.0)
    }

    pub fn is_apology(&self) -> bool {
        self.confidence == 0.0 && self.text == APOLOGY
    }
}

/// Produces the assistant reply for turns routed to one handler.
#[async_trait]
pub trait Responder: Send + Sync {
    /// The handler this generator answers for.
    fn handler(&self) -> Handler;

    /// Generate a reply. Infallible; failures degrade to [`Reply::apology`].
    async fn respond(&self, request: &TurnRequest<'_>) -> Reply;
}

/// Append the conversation-history block used by the model-backed generators.
pub(crate) fn push_context(prompt: &mut String, context: &RoutingContext) {
    if let Some(json) = context.to_prompt_json() {
        prompt.push_str("Here is some recent conversation history for context:\n");
        prompt.push_str(&json);
        prompt.push_str("\n\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apology_reply() {
        let reply = Reply::apology();
        assert_eq!(reply.confidence, 0.0);
        assert!(reply.is_apology());
        assert!(!Reply::new(APOLOGY, 0.7).is_apology());
    }

    #[test]
    fn test_push_context_skips_empty() {
        let mut prompt = String::from("start\n");
        push_context(&mut prompt, &RoutingContext::empty());
        assert_eq!(prompt, "start\n");
    }

    #[test]
    fn test_push_context_embeds_json() {
        let log = vec![hearth_core::Turn::user("mold on the wall")];
        let ctx = RoutingContext::from_turns(&log, 6);
        let mut prompt = String::new();
        push_context(&mut prompt, &ctx);
        assert!(prompt.starts_with("Here is some recent conversation history"));
        assert!(prompt.contains("mold on the wall"));
    }
}
