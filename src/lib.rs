//! Pizza Assistant - Voice assistant that chats and orders pizza
//!
//! This library provides the pieces of the assistant:
//! - Voice processing (microphone capture, STT, TTS, playback)
//! - The dialogue loop and the order sub-dialogue
//! - A conversation client for open-ended chat
//! - The ordering microservice and its HTTP client
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Dialogue Loop                        │
//! │   Intent  │  Order Sub-Dialogue  │  Chat             │
//! └──────┬──────────────┬───────────────────┬───────────┘
//!        │              │                   │
//! ┌──────▼──────┐ ┌─────▼──────────┐ ┌──────▼──────────┐
//! │  STT / TTS  │ │ Order Gateway  │ │  Conversation   │
//! │   (voice)   │ │    (HTTP)      │ │  (chat LLM)     │
//! └─────────────┘ └─────┬──────────┘ └─────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────┐
//! │        Ordering Microservice (axum)                  │
//! │   /store-lookup  │  /place-order  │  Vendor          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod conversation;
pub mod dialogue;
pub mod error;
pub mod order;
pub mod vendor;
pub mod voice;

pub use config::Config;
pub use conversation::{ChatCompletionClient, Conversation};
pub use dialogue::{Assistant, DialogueStats, Intent, TurnOutcome};
pub use error::{Error, Result};
pub use order::{HttpOrderGateway, OrderGateway, OrderRequest, OrderResult, StoreLookupResult};
pub use vendor::PizzaVendor;
