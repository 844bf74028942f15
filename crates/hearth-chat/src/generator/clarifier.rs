//! Clarifying replies for turns the router could not place.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::Rng;

use hearth_core::config::ClarifySelection;
use hearth_core::Handler;

use super::{Reply, Responder, TurnRequest};

pub const CLARIFY_PROMPTS: [&str; 3] = [
    "I'm not sure if you need help with a property issue or a tenancy question. Can you please clarify?",
    "To assist you better, could you specify if your query is about a problem with a property or about rental/tenancy matters?",
    "Are you asking about a property issue or a question about tenancy laws? Please tell me more.",
];

/// Asks the user to say whether they have a property issue or a tenancy question.
#[derive(Debug)]
pub struct Clarifier {
    selection: ClarifySelection,
    next: AtomicUsize,
}

impl Default for Clarifier {
    fn default() -> Self {
        Self::new(ClarifySelection::default())
    }
}

impl Clarifier {
    pub fn new(selection: ClarifySelection) -> Self {
        Self {
            selection,
            next: AtomicUsize::new(0),
        }
    }

    fn pick(&self) -> &'static str {
        let index = match self.selection {
            ClarifySelection::Random => rand::rng().random_range(0..CLARIFY_PROMPTS.len()),
            ClarifySelection::RoundRobin => {
                self.next.fetch_add(1, Ordering::Relaxed) % CLARIFY_PROMPTS.len()
            }
            ClarifySelection::First => 0,
        };
        CLARIFY_PROMPTS[index]
    }
}

#[async_trait]
impl Responder for Clarifier {
    fn handler(&self) -> Handler {
        Handler::Clarify
    }

    async fn respond(&self, _request: &TurnRequest<'_>) -> Reply {
        Reply::new(self.pick(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RoutingContext;

    #[tokio::test]
    async fn test_random_picks_from_fixed_set() {
        let clarifier = Clarifier::default();
        let ctx = RoutingContext::empty();
        for _ in 0..20 {
            let reply = clarifier.respond(&TurnRequest::new("hi", &ctx)).await;
            assert!(CLARIFY_PROMPTS.contains(&reply.text.as_str()));
            assert_eq!(reply.confidence, 1.0);
        }
    }

    #[tokio::test]
    async fn test_round_robin_cycles() {
        let clarifier = Clarifier::new(ClarifySelection::RoundRobin);
        let ctx = RoutingContext::empty();
        let request = TurnRequest::new("", &ctx);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(clarifier.respond(&request).await.text);
        }
        assert_eq!(seen[0], CLARIFY_PROMPTS[0]);
        assert_eq!(seen[1], CLARIFY_PROMPTS[1]);
        assert_eq!(seen[2], CLARIFY_PROMPTS[2]);
        assert_eq!(seen[3], CLARIFY_PROMPTS[0]);
    }

    #[tokio::test]
    async fn test_first_is_stable() {
        let clarifier = Clarifier::new(ClarifySelection::First);
        let ctx = RoutingContext::empty();
        let a = clarifier.respond(&TurnRequest::new("x", &ctx)).await;
        let b = clarifier.respond(&TurnRequest::new("y", &ctx)).await;
        assert_eq!(a, b);
        assert_eq!(clarifier.handler(), Handler::Clarify);
    }
}
