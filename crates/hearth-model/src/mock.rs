//! Scripted model client for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use hearth_core::ImageAttachment;

use crate::client::ModelClient;
use crate::error::ModelError;

/// A recorded call made against a [`MockModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    /// MIME type of the image for vision calls, `None` for text calls.
    pub image_mime: Option<String>,
}

/// Mock model that replays scripted replies and records every prompt.
///
/// Queued replies are consumed first; once the queue is empty the fallback
/// reply (or failure) is returned for every call.
#[derive(Debug)]
pub struct MockModel {
    queue: Mutex<VecDeque<Result<String, ModelError>>>,
    fallback: Result<String, ModelError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockModel {
    /// Mock that answers every call with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_fallback(Ok(reply.into()))
    }

    /// Mock whose every call fails.
    pub fn failing() -> Self {
        Self::with_fallback(Err(ModelError::Request("mock failure".to_string())))
    }

    fn with_fallback(fallback: Result<String, ModelError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-shot reply ahead of the fallback.
    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    /// Queue a one-shot failure ahead of the fallback.
    pub fn then_fail(self, error: ModelError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, item: Result<String, ModelError>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(item);
        }
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn answer(&self, prompt: &str, image: Option<&ImageAttachment>) -> Result<String, ModelError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                image_mime: image.map(|i| i.mime_type.clone()),
            });
        }
        let queued = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn invoke_text(&self, prompt: &str) -> Result<String, ModelError> {
        self.answer(prompt, None)
    }

    async fn invoke_vision(
        &self,
        prompt: &str,
        image: &ImageAttachment,
    ) -> Result<String, ModelError> {
        self.answer(prompt, Some(image))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replying_records_calls() {
        let model = MockModel::replying("issue");
        assert_eq!(model.invoke_text("route this").await.unwrap(), "issue");
        assert_eq!(model.invoke_text("and this").await.unwrap(), "issue");

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].prompt, "route this");
        assert!(calls[0].image_mime.is_none());
    }

    #[tokio::test]
    async fn test_queue_consumed_before_fallback() {
        let model = MockModel::failing()
            .then_reply("tenancy")
            .then_fail(ModelError::EmptyResponse);
        assert_eq!(model.invoke_text("a").await.unwrap(), "tenancy");
        assert_eq!(
            model.invoke_text("b").await.unwrap_err(),
            ModelError::EmptyResponse
        );
        assert!(matches!(
            model.invoke_text("c").await.unwrap_err(),
            ModelError::Request(_)
        ));
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_vision_call_records_mime() {
        let model = MockModel::replying("water damage");
        let image = ImageAttachment::sniff(b"GIF89a..".to_vec(), None).unwrap();
        model.invoke_vision("look", &image).await.unwrap();
        assert_eq!(model.calls()[0].image_mime.as_deref(), Some("image/gif"));
    }
}
