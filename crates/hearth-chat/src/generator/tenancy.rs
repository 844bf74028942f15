//! Tenancy law advisor.

use std::sync::Arc;

use async_trait::async_trait;

use hearth_core::Handler;
use hearth_model::ModelClient;

use super::{push_context, Reply, Responder, TurnRequest};

pub const TENANCY_CONFIDENCE: f32 = 0.8;

/// Answers rental and tenancy-law questions, optionally scoped to a location.
pub struct TenancyGenerator {
    model: Arc<dyn ModelClient>,
}

impl TenancyGenerator {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    fn prompt(request: &TurnRequest<'_>) -> String {
        let mut prompt = String::from(
            "You are a helpful AI assistant specializing in tenancy law and rental guidance. \
             Provide comprehensive and accurate information based on the user's query.\n\n",
        );

        if let Some(location) = request.location.map(str::trim).filter(|l| !l.is_empty()) {
            prompt.push_str(&format!(
                "Consider the laws and regulations specific to {}.\n\n",
                location
            ));
        }

        push_context(&mut prompt, request.context);

        prompt.push_str(&format!("User query: {}\n\n", request.text));
        prompt.push_str(
            "Please provide a detailed response covering the relevant legal aspects, tenant rights, \
             landlord responsibilities, and recommended next steps. \
             Format your response clearly with headings and bullet points.",
        );
        prompt
    }
}

#[async_trait]
impl Responder for TenancyGenerator {
    fn handler(&self) -> Handler {
        Handler::Tenancy
    }

    async fn respond(&self, request: &TurnRequest<'_>) -> Reply {
        let prompt = Self::prompt(request);
        match self.model.invoke_text(&prompt).await {
            Ok(text) => Reply::new(text, TENANCY_CONFIDENCE),
            Err(e) => {
                tracing::warn!(error = %e, "Tenancy answer failed");
                Reply::apology()
            }
        }
    }
}
