//! Error types for the pizza assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the assistant and ordering service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device or encoding error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Language-model completion error
    #[error("conversation error: {0}")]
    Conversation(String),

    /// Ordering gateway error
    #[error("order error: {0}")]
    Order(String),

    /// Pizza vendor error
    #[error("vendor error: {0}")]
    Vendor(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
