//! Keyword scoring used when the routing model is unavailable.

use hearth_core::config::RoutingConfig;
use hearth_core::Handler;

/// Presence counts of issue and tenancy keywords in a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordScore {
    pub issue: u32,
    pub tenancy: u32,
}

impl KeywordScore {
    /// Pick a handler from the scores.
    ///
    /// An attached image always means `Issue`; otherwise the higher score
    /// wins and a tie (including 0–0) asks for clarification.
    pub fn decide(&self, has_image: bool) -> Handler {
        if has_image || self.issue > self.tenancy {
            Handler::Issue
        } else if self.tenancy > self.issue {
            Handler::Tenancy
        } else {
            Handler::Clarify
        }
    }
}

/// Scores free text against two fixed keyword sets.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    issue_keywords: Vec<String>,
    tenancy_keywords: Vec<String>,
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(&RoutingConfig::default())
    }
}

impl KeywordScorer {
    /// Build a scorer from configured keyword sets.
    ///
    /// Keywords are lowercased and trimmed; blank entries are dropped.
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            issue_keywords: normalize(&config.issue_keywords),
            tenancy_keywords: normalize(&config.tenancy_keywords),
        }
    }

    /// Count how many keywords of each set occur as substrings of `text`.
    ///
    /// Matching is case-insensitive and each keyword counts at most once.
    pub fn score(&self, text: &str) -> KeywordScore {
        let lower = text.to_lowercase();
        KeywordScore {
            issue: count_present(&self.issue_keywords, &lower),
            tenancy: count_present(&self.tenancy_keywords, &lower),
        }
    }

    pub fn issue_keywords(&self) -> &[String] {
        &self.issue_keywords
    }

    pub fn tenancy_keywords(&self) -> &[String] {
        &self.tenancy_keywords
    }
}

fn normalize(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn count_present(keywords: &[String], lower: &str) -> u32 {
    keywords.iter().filter(|k| lower.contains(k.as_str())).count() as u32
}
