//! The model capability trait.

use async_trait::async_trait;

use hearth_core::ImageAttachment;

use crate::error::ModelError;

/// A remote language model reachable with a text prompt, optionally with an image.
///
/// Implementations must be cheap to share behind an `Arc`; the router and
/// every generator hold the same client.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send a text-only prompt and return the model's reply.
    async fn invoke_text(&self, prompt: &str) -> Result<String, ModelError>;

    /// Send a prompt together with an image and return the model's reply.
    async fn invoke_vision(
        &self,
        prompt: &str,
        image: &ImageAttachment,
    ) -> Result<String, ModelError>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

/// Client used when no API key is configured.
///
/// Every call fails, so routing runs on keywords and generators apologize.
#[derive(Debug, Clone, Default)]
pub struct DisabledModel;

#[async_trait]
impl ModelClient for DisabledModel {
    async fn invoke_text(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::NotConfigured("no API key".to_string()))
    }

    async fn invoke_vision(
        &self,
        _prompt: &str,
        _image: &ImageAttachment,
    ) -> Result<String, ModelError> {
        Err(ModelError::NotConfigured("no API key".to_string()))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
