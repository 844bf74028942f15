use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// The response generator that produced an assistant turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handler {
    /// General clarifier (the main assistant).
    #[serde(alias = "router")]
    Clarify,
    /// Property-issue analyzer.
    Issue,
    /// Tenancy-law advisor.
    Tenancy,
}

impl Handler {
    /// All handlers in their fixed reporting order.
    pub const ALL: [Handler; 3] = [Handler::Clarify, Handler::Issue, Handler::Tenancy];

    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Handler::Clarify => "clarify",
            Handler::Issue => "issue",
            Handler::Tenancy => "tenancy",
        }
    }

    /// Human-facing name of the agent behind this handler.
    pub fn display_name(&self) -> &'static str {
        match self {
            Handler::Clarify => "Main Assistant",
            Handler::Issue => "Issue Detection Agent",
            Handler::Tenancy => "Tenancy FAQ Agent",
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

// =============================================================================
// Turns
// =============================================================================

/// Author of a turn together with the data only assistant turns carry.
///
/// Keeping the handler inside the `Assistant` variant means a user turn can
/// never carry one and an assistant turn can never lack one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant {
        handler: Handler,
        /// `None` only for the synthetic welcome turn.
        confidence: Option<f32>,
    },
}

/// One message in a conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    #[serde(flatten)]
    pub author: Author,
    /// Message body; empty when only an image was sent.
    pub text: String,
    pub has_image: bool,
    /// Display name of the attached image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Greeting placed at the head of every fresh conversation.
pub const WELCOME_MESSAGE: &str = "\u{1f44b} **Welcome to your Multi-Agent Real Estate Assistant!**

I'm here to help with property issues and tenancy questions. I have two specialized agents:

\u{1f50d} **Issue Detection Agent**: Upload images for property issue analysis (water damage, cracks, mold, etc.)
\u{2696}\u{fe0f} **Tenancy FAQ Agent**: Get guidance on rental laws, tenant rights, and landlord responsibilities

**How can I assist you today?**";

impl Turn {
    /// A user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::User,
            text: text.into(),
            has_image: false,
            image_name: None,
            created_at: Utc::now(),
        }
    }

    /// Mark this turn as carrying an image.
    pub fn with_image(mut self, name: Option<String>) -> Self {
        self.has_image = true;
        self.image_name = name;
        self
    }

    /// An assistant reply produced by `handler`.
    pub fn assistant(text: impl Into<String>, handler: Handler, confidence: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::Assistant {
                handler,
                confidence: Some(confidence.clamp(0.0, 1.0)),
            },
            text: text.into(),
            has_image: false,
            image_name: None,
            created_at: Utc::now(),
        }
    }

    /// The synthetic greeting that opens every conversation.
    pub fn welcome() -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::Assistant {
                handler: Handler::Clarify,
                confidence: None,
            },
            text: WELCOME_MESSAGE.to_string(),
            has_image: false,
            image_name: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this is the synthetic welcome turn.
    pub fn is_greeting(&self) -> bool {
        matches!(
            self.author,
            Author::Assistant {
                confidence: None,
                ..
            }
        )
    }

    pub fn role(&self) -> Role {
        match self.author {
            Author::User => Role::User,
            Author::Assistant { .. } => Role::Assistant,
        }
    }

    /// Handler of an assistant turn; `None` for user turns.
    pub fn handler(&self) -> Option<Handler> {
        match self.author {
            Author::User => None,
            Author::Assistant { handler, .. } => Some(handler),
        }
    }

    /// Confidence of an assistant turn; `None` for user turns and the greeting.
    pub fn confidence(&self) -> Option<f32> {
        match self.author {
            Author::User => None,
            Author::Assistant { confidence, .. } => confidence,
        }
    }
}

// =============================================================================
// Images
// =============================================================================

/// An image sent alongside a user message.
///
/// The bytes are forwarded to the vision model and never stored in the log.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub name: Option<String>,
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("name", &self.name)
            .finish()
    }
}

impl ImageAttachment {
    /// Build an attachment, detecting the MIME type from magic bytes.
    ///
    /// Returns `None` when the bytes are not a supported image format
    /// (PNG, JPEG, GIF, BMP, WEBP).
    pub fn sniff(bytes: Vec<u8>, name: Option<String>) -> Option<Self> {
        let mime_type = sniff_mime_type(&bytes)?;
        Some(Self {
            bytes,
            mime_type: mime_type.to_string(),
            name,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some("image/bmp")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_handler_order_and_labels() {
        assert_eq!(
            Handler::ALL,
            [Handler::Clarify, Handler::Issue, Handler::Tenancy]
        );
        assert_eq!(Handler::Issue.to_string(), "issue");
        assert_eq!(Handler::Tenancy.display_name(), "Tenancy FAQ Agent");
    }

    #[test]
    fn test_handler_router_alias() {
        let h: Handler = serde_json::from_str("\"router\"").unwrap();
        assert_eq!(h, Handler::Clarify);
        let h: Handler = serde_json::from_str("\"clarify\"").unwrap();
        assert_eq!(h, Handler::Clarify);
        assert_eq!(serde_json::to_string(&Handler::Clarify).unwrap(), "\"clarify\"");
    }

    #[test]
    fn test_user_turn_has_no_handler() {
        let turn = Turn::user("my sink is leaking");
        assert_eq!(turn.role(), Role::User);
        assert!(turn.handler().is_none());
        assert!(turn.confidence().is_none());
        assert!(!turn.has_image);
    }

    #[test]
    fn test_user_turn_with_image() {
        let turn = Turn::user("").with_image(Some("wall.jpg".to_string()));
        assert!(turn.has_image);
        assert_eq!(turn.image_name.as_deref(), Some("wall.jpg"));
        assert!(turn.handler().is_none());
    }

    #[test]
    fn test_assistant_turn_has_handler() {
        let turn = Turn::assistant("Looks like a leak.", Handler::Issue, 0.7);
        assert_eq!(turn.role(), Role::Assistant);
        assert_eq!(turn.handler(), Some(Handler::Issue));
        assert_eq!(turn.confidence(), Some(0.7));
    }

    #[test]
    fn test_assistant_confidence_clamped() {
        let turn = Turn::assistant("x", Handler::Tenancy, 1.5);
        assert_eq!(turn.confidence(), Some(1.0));
    }

    #[test]
    fn test_welcome_turn() {
        let turn = Turn::welcome();
        assert_eq!(turn.handler(), Some(Handler::Clarify));
        assert!(turn.confidence().is_none());
        assert!(turn.text.contains("Welcome"));
        assert!(turn.is_greeting());
        assert!(!Turn::assistant("x", Handler::Clarify, 1.0).is_greeting());
        assert!(!Turn::user("x").is_greeting());
    }

    #[test]
    fn test_turn_serializes_flat() {
        let turn = Turn::assistant("Check your lease.", Handler::Tenancy, 0.8);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["handler"], "tenancy");
        assert_eq!(json["text"], "Check your lease.");
        assert!(json.get("image_name").is_none());

        let user = serde_json::to_value(Turn::user("hi")).unwrap();
        assert_eq!(user["role"], "user");
        assert!(user.get("handler").is_none());
    }

    #[test]
    fn test_turn_deserializes_flat() {
        let turn = Turn::assistant("ok", Handler::Issue, 0.7);
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back.handler(), Some(Handler::Issue));
        assert_eq!(back.id, turn.id);
    }

    #[test]
    fn test_sniff_png() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        let image = ImageAttachment::sniff(bytes, Some("ceiling.png".into())).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.name.as_deref(), Some("ceiling.png"));
        assert_eq!(image.len(), 24);
    }

    #[test]
    fn test_sniff_jpeg_gif_webp() {
        let jpeg = ImageAttachment::sniff(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0], None).unwrap();
        assert_eq!(jpeg.mime_type, "image/jpeg");

        let gif = ImageAttachment::sniff(b"GIF89a......".to_vec(), None).unwrap();
        assert_eq!(gif.mime_type, "image/gif");

        let webp = ImageAttachment::sniff(b"RIFF\0\0\0\0WEBPVP8 ".to_vec(), None).unwrap();
        assert_eq!(webp.mime_type, "image/webp");
    }

    #[test]
    fn test_sniff_rejects_unknown() {
        assert!(ImageAttachment::sniff(b"%PDF-1.7".to_vec(), None).is_none());
        assert!(ImageAttachment::sniff(Vec::new(), None).is_none());
    }

    #[test]
    fn test_image_debug_hides_bytes() {
        let image = ImageAttachment::sniff(vec![0xFF, 0xD8, 0xFF, 1, 2, 3], None).unwrap();
        let dbg = format!("{:?}", image);
        assert!(dbg.contains("len: 6"));
        assert!(!dbg.contains("255"));
    }
}
