use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Hearth application.
///
/// Loaded from `~/.hearth/config.toml` by default. Each section corresponds
/// to one crate or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl HearthConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HearthConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Default user location (city, state/country) for new sessions.
    pub location: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            location: None,
        }
    }
}

/// Remote language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API key. When absent, `GEMINI_API_KEY` is consulted.
    pub api_key: Option<String>,
    /// Base URL of the `generateContent` endpoint family.
    pub base_url: String,
    /// Model used for text-only prompts.
    pub text_model: String,
    /// Model used for prompts carrying an image.
    pub vision_model: String,
    /// Upper bound on generated tokens per reply.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Resolve the API key: config value first, then `GEMINI_API_KEY`.
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var("GEMINI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            vision_model: "gemini-2.5-flash".to_string(),
            max_output_tokens: 1500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

/// Keyword sets used when the routing model is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Keywords that suggest a physical property issue.
    pub issue_keywords: Vec<String>,
    /// Keywords that suggest a tenancy-law question.
    pub tenancy_keywords: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            issue_keywords: owned(&[
                "damage", "broken", "crack", "leak", "mold", "repair", "fix", "issue",
            ]),
            tenancy_keywords: owned(&[
                "landlord", "tenant", "rent", "deposit", "evict", "lease", "rights", "law",
                "legal",
            ]),
        }
    }
}

/// How the clarifier chooses among its fixed prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarifySelection {
    /// Uniformly random pick.
    #[default]
    Random,
    /// Cycle through the prompts in order.
    RoundRobin,
    /// Always the first prompt.
    First,
}

/// Conversation handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of recent turns passed to the model as context.
    pub context_turns: usize,
    /// Maximum message length in characters.
    pub max_message_length: usize,
    /// Maximum attached image size in bytes.
    pub max_image_bytes: usize,
    /// Clarification prompt selection policy.
    pub clarify_selection: ClarifySelection,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_turns: 6,
            max_message_length: 2000,
            max_image_bytes: 10 * 1024 * 1024,
            clarify_selection: ClarifySelection::Random,
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}
