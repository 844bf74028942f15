//! Turn router: picks the handler for an incoming message.
//!
//! The decision is delegated to the language model; when the model call
//! fails the keyword scorer decides instead. `decide` never fails.

use std::sync::Arc;

use hearth_core::Handler;
use hearth_model::ModelClient;

use crate::context::RoutingContext;
use crate::keywords::KeywordScorer;

/// Routes turns among the clarifier, issue analyzer and tenancy advisor.
pub struct Router {
    model: Arc<dyn ModelClient>,
    scorer: KeywordScorer,
}

impl Router {
    pub fn new(model: Arc<dyn ModelClient>, scorer: KeywordScorer) -> Self {
        Self { model, scorer }
    }

    /// Decide which handler should answer `text`.
    ///
    /// An attached image routes straight to `Issue` without a model call.
    pub async fn decide(&self, text: &str, has_image: bool, context: &RoutingContext) -> Handler {
        if has_image {
            tracing::debug!("Image attached, routing to issue handler");
            return Handler::Issue;
        }

        let prompt = build_routing_prompt(text, context);
        match self.model.invoke_text(&prompt).await {
            Ok(reply) => {
                let handler = parse_routing_reply(&reply);
                tracing::debug!(%handler, reply = %reply.trim(), "Model routing decision");
                handler
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    model = self.model.name(),
                    "Routing model call failed, using keyword fallback"
                );
                let score = self.scorer.score(text);
                let handler = score.decide(has_image);
                tracing::debug!(
                    %handler,
                    issue_score = score.issue,
                    tenancy_score = score.tenancy,
                    "Keyword routing decision"
                );
                handler
            }
        }
    }

    /// Human-readable explanation of a routing decision.
    pub fn explain(&self, handler: Handler, has_image: bool) -> String {
        let base = match handler {
            Handler::Issue => "\u{1f50d} Routed to Issue Detection Agent",
            Handler::Tenancy => "\u{2696}\u{fe0f} Routed to Tenancy FAQ Agent",
            Handler::Clarify => "\u{1f3e0} Handled by Main Assistant (needs clarification)",
        };
        match (handler, has_image) {
            (Handler::Issue, true) => format!("{} due to image upload.", base),
            (Handler::Clarify, _) => format!(
                "{}. Your query was unclear or didn't match specific keywords. Please provide more details.",
                base
            ),
            _ => format!("{} based on the analysis of your request.", base),
        }
    }

    pub fn scorer(&self) -> &KeywordScorer {
        &self.scorer
    }
}

/// Build the prompt asking the model for a one-word routing label.
pub fn build_routing_prompt(text: &str, context: &RoutingContext) -> String {
    let mut prompt = String::from(
        "Analyze the following user query and determine if it is related to property issues or tenancy law/rental guidance.\n",
    );

    if let Some(json) = context.to_prompt_json() {
        prompt.push_str(&format!(
            "Consider the following conversation context:\n{}\n\n",
            json
        ));
    }

    prompt.push_str(&format!("User query: {}\n\n", text));
    prompt.push_str(
        "Respond with only one word: 'issue' if it is related to property issues, 'tenancy' if it is related to tenancy law or rental guidance, or 'general' if it is neither or unclear.",
    );
    prompt
}

/// Map the model's routing reply to a handler.
///
/// Matching is by substring so decorated replies ("Issue.", "**tenancy**")
/// still route. "issue" is checked first, so a reply mentioning both labels
/// routes to `Issue`. The precedence is likely unintended but preserved.
pub fn parse_routing_reply(reply: &str) -> Handler {
    let decision = reply.trim().to_lowercase();
    if decision.contains("issue") {
        Handler::Issue
    } else if decision.contains("tenancy") {
        Handler::Tenancy
    } else {
        Handler::Clarify
    }
}
