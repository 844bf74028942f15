//! Property issue analyzer.

use std::sync::Arc;

use async_trait::async_trait;

use hearth_core::Handler;
use hearth_model::ModelClient;

use super::{push_context, Reply, Responder, TurnRequest};

/// Confidence attached to every successful issue analysis.
pub const ISSUE_CONFIDENCE: f32 = 0.7;

/// Analyzes property problems from a description and an optional photo.
pub struct IssueGenerator {
    model: Arc<dyn ModelClient>,
}

impl IssueGenerator {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    fn text_prompt(request: &TurnRequest<'_>) -> String {
        let mut prompt = format!(
            "You are an AI assistant specialized in identifying potential property issues based on text descriptions. \
             Analyze the following description and provide a brief assessment of the likely issue, its possible severity, \
             and initial recommendations.\n\nUser description: {}\n\n",
            request.text
        );
        push_context(&mut prompt, request.context);
        prompt.push_str("Please provide a concise response. Indicate the confidence level of your assessment.");
        prompt
    }

    fn image_prompt(request: &TurnRequest<'_>) -> String {
        let mut prompt = format!(
            "You are an AI assistant specialized in identifying and analyzing property issues from images. \
             Examine the provided image and the user's description to identify any potential issues. \
             Describe the issue(s) you observe, assess their severity, and suggest initial recommendations \
             for addressing them.\n\nUser description: {}\n\n",
            request.text
        );
        push_context(&mut prompt, request.context);
        prompt.push_str(
            "Please provide a detailed analysis based on the image and description. \
             Indicate the confidence level of your assessment.",
        );
        prompt
    }
}

#[async_trait]
impl Responder for IssueGenerator {
    fn handler(&self) -> Handler {
        Handler::Issue
    }

    async fn respond(&self, request: &TurnRequest<'_>) -> Reply {
        let result = match request.image {
            Some(image) => {
                let prompt = Self::image_prompt(request);
                self.model.invoke_vision(&prompt, image).await
            }
            None => {
                let prompt = Self::text_prompt(request);
                self.model.invoke_text(&prompt).await
            }
        };

        match result {
            Ok(text) => Reply::new(text, ISSUE_CONFIDENCE),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    with_image = request.image.is_some(),
                    "Issue analysis failed"
                );
                Reply::apology()
            }
        }
    }
}
