//! Intent classification
//!
//! Decides what the dialogue does with an utterance. The matching strategy
//! sits behind [`IntentClassifier`] so it can change without touching the
//! loop.

use crate::config::DialogueConfig;

/// What the user wants from a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// End the session
    Quit,
    /// Start the order sub-dialogue
    Order,
    /// Anything else; forwarded to the conversation client
    Chat,
}

/// Maps an utterance to an [`Intent`]
pub trait IntentClassifier: Send + Sync {
    /// Classify a non-empty utterance
    fn classify(&self, utterance: &str) -> Intent;
}

/// Case-insensitive substring matching
///
/// The quit phrase wins over order triggers; everything else is chat.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    quit_keyword: String,
    order_triggers: Vec<String>,
}

impl KeywordClassifier {
    /// Create a classifier; phrases are normalized to trimmed lowercase
    #[must_use]
    pub fn new(quit_keyword: &str, order_triggers: &[String]) -> Self {
        let order_triggers = order_triggers
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            quit_keyword: quit_keyword.trim().to_lowercase(),
            order_triggers,
        }
    }

    #[must_use]
    pub fn from_config(config: &DialogueConfig) -> Self {
        Self::new(&config.quit_keyword, &config.order_triggers)
    }

    /// The normalized quit phrase
    #[must_use]
    pub fn quit_keyword(&self) -> &str {
        &self.quit_keyword
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, utterance: &str) -> Intent {
        let normalized = utterance.to_lowercase();

        if !self.quit_keyword.is_empty() && normalized.contains(&self.quit_keyword) {
            return Intent::Quit;
        }

        if let Some(trigger) = self
            .order_triggers
            .iter()
            .find(|t| normalized.contains(t.as_str()))
        {
            tracing::debug!(trigger, "order trigger matched");
            return Intent::Order;
        }

        Intent::Chat
    }
}
