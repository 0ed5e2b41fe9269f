//! The dialogue loop
//!
//! Each turn listens for one utterance and routes it by intent: quit ends
//! the session, an order trigger runs the [`OrderDialogue`], and anything
//! else goes to the conversation client. The loop owns its adapters and
//! keeps no state between turns besides counters.

mod intent;
mod order_flow;

use std::sync::Arc;

pub use intent::{Intent, IntentClassifier, KeywordClassifier};
pub use order_flow::{NO_STORE, NOT_HEARD, ORDER_FAILED, OrderDialogue, OrderOutcome};

use crate::config::{DEFAULT_SLOT_ATTEMPTS, DialogueConfig};
use crate::conversation::Conversation;
use crate::order::OrderGateway;
use crate::voice::{SpeechInput, SpeechOutput};

/// Spoken when the conversation client fails
pub const CHAT_FAILED: &str = "Sorry, I couldn't come up with an answer just now.";

/// Opening line naming the configured order trigger and quit phrase
#[must_use]
pub fn greeting(config: &DialogueConfig) -> String {
    let trigger = config
        .order_triggers
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or("order pizza");
    let quit = config.quit_keyword.trim();
    format!("Hi! Ask me anything, say \"{trigger}\" to order, or \"{quit}\" to leave.")
}

/// Whether the loop keeps going after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Quit,
}

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogueStats {
    pub turns: u32,
    pub empty_turns: u32,
    pub chat_replies: u32,
    pub chat_failures: u32,
    pub orders_placed: u32,
    pub orders_not_placed: u32,
}

/// Voice assistant session
pub struct Assistant {
    input: Box<dyn SpeechInput>,
    output: Box<dyn SpeechOutput>,
    conversation: Arc<dyn Conversation>,
    gateway: Arc<dyn OrderGateway>,
    classifier: Box<dyn IntentClassifier>,
    slot_attempts: u32,
    greeting: Option<String>,
    stats: DialogueStats,
}

#[allow(clippy::future_not_send)]
impl Assistant {
    /// Create a session with the keyword classifier and default attempts
    pub fn new(
        input: Box<dyn SpeechInput>,
        output: Box<dyn SpeechOutput>,
        conversation: Arc<dyn Conversation>,
        gateway: Arc<dyn OrderGateway>,
    ) -> Self {
        Self {
            input,
            output,
            conversation,
            gateway,
            classifier: Box::new(KeywordClassifier::from_config(&DialogueConfig::default())),
            slot_attempts: DEFAULT_SLOT_ATTEMPTS,
            greeting: None,
            stats: DialogueStats::default(),
        }
    }

    /// Apply quit phrase, order triggers and slot attempts from config
    #[must_use]
    pub fn with_dialogue_config(mut self, config: &DialogueConfig) -> Self {
        self.classifier = Box::new(KeywordClassifier::from_config(config));
        self.slot_attempts = config.slot_attempts;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    #[must_use]
    pub const fn with_slot_attempts(mut self, attempts: u32) -> Self {
        self.slot_attempts = attempts;
        self
    }

    /// Spoken once before the first listen cycle
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    #[must_use]
    pub const fn stats(&self) -> DialogueStats {
        self.stats
    }

    /// Listen and respond until the user quits
    pub async fn run(&mut self) -> DialogueStats {
        tracing::info!("dialogue started");

        if let Some(greeting) = self.greeting.take() {
            self.output.speak(&greeting).await;
        }

        loop {
            let utterance = self.input.listen().await;
            if self.turn(&utterance).await == TurnOutcome::Quit {
                break;
            }
        }

        tracing::info!(
            turns = self.stats.turns,
            chat_replies = self.stats.chat_replies,
            orders_placed = self.stats.orders_placed,
            orders_not_placed = self.stats.orders_not_placed,
            "dialogue ended"
        );
        self.stats
    }

    /// Handle one utterance
    pub async fn turn(&mut self, utterance: &str) -> TurnOutcome {
        self.stats.turns += 1;

        let utterance = utterance.trim();
        if utterance.is_empty() {
            self.stats.empty_turns += 1;
            tracing::trace!("nothing heard");
            return TurnOutcome::Continue;
        }

        let intent = self.classifier.classify(utterance);
        tracing::debug!(?intent, utterance, "turn");

        match intent {
            Intent::Quit => return TurnOutcome::Quit,
            Intent::Order => self.order().await,
            Intent::Chat => self.chat(utterance).await,
        }

        TurnOutcome::Continue
    }

    async fn chat(&mut self, utterance: &str) {
        match self.conversation.reply(utterance).await {
            Ok(reply) => {
                self.stats.chat_replies += 1;
                self.output.speak(&reply).await;
            }
            Err(e) => {
                self.stats.chat_failures += 1;
                tracing::error!(error = %e, "conversation failed");
                self.output.speak(CHAT_FAILED).await;
            }
        }
    }

    async fn order(&mut self) {
        let outcome = OrderDialogue::new(
            self.input.as_mut(),
            self.output.as_mut(),
            self.gateway.as_ref(),
            self.slot_attempts,
        )
        .run()
        .await;

        tracing::info!(?outcome, "order dialogue finished");
        match outcome {
            OrderOutcome::Placed { .. } => self.stats.orders_placed += 1,
            OrderOutcome::NoStore | OrderOutcome::Failed | OrderOutcome::Abandoned { .. } => {
                self.stats.orders_not_placed += 1;
            }
        }
    }
}
