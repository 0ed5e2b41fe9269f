//! Configuration management for the pizza assistant
//!
//! Every client receives the pieces of [`Config`] it needs at construction
//! time. Values resolve env > toml > default.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

use file::ConfigFile;

/// Default quit phrase
pub const DEFAULT_QUIT_KEYWORD: &str = "quit";

/// Default listen attempts per order slot
pub const DEFAULT_SLOT_ATTEMPTS: u32 = 2;

/// Default timeout for every outbound HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default ordering microservice port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Longest accepted listen cycle
pub const MAX_LISTEN_LIMIT: Duration = Duration::from_secs(300);

const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly voice assistant. \
     Keep responses short and conversational because they will be spoken aloud.";

/// Pizza assistant configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API keys
    pub api_keys: ApiKeys,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Language-model configuration
    pub llm: LlmConfig,

    /// Dialogue behaviour
    pub dialogue: DialogueConfig,

    /// Ordering gateway client configuration
    pub order: OrderConfig,

    /// Ordering microservice configuration
    pub server: ServerConfig,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper, TTS, chat completions)
    pub openai: Option<SecretString>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<SecretString>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<SecretString>,
}

/// Speech recognition backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SttProviderKind {
    #[default]
    Whisper,
    Deepgram,
}

impl SttProviderKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "whisper" | "openai" => Ok(Self::Whisper),
            "deepgram" => Ok(Self::Deepgram),
            other => Err(Error::Config(format!("unknown STT provider: {other}"))),
        }
    }
}

/// Speech synthesis backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtsProviderKind {
    #[default]
    OpenAI,
    ElevenLabs,
}

impl TtsProviderKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "elevenlabs" => Ok(Self::ElevenLabs),
            other => Err(Error::Config(format!("unknown TTS provider: {other}"))),
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub stt_provider: SttProviderKind,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    pub tts_provider: TtsProviderKind,

    /// TTS model (e.g. "tts-1", "`eleven_monolingual_v1`")
    pub tts_model: String,

    /// TTS voice identifier (`ElevenLabs` voice id when using `ElevenLabs`)
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,

    /// Maximum duration of one listen cycle
    pub max_listen: Duration,

    /// Transient synthesized-audio artifact
    pub artifact_path: PathBuf,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_provider: SttProviderKind::Whisper,
            stt_model: "whisper-1".to_string(),
            tts_provider: TtsProviderKind::OpenAI,
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
            max_listen: Duration::from_secs(10),
            artifact_path: default_artifact_path(),
        }
    }
}

/// Language-model configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    pub max_tokens: u32,

    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 256,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Dialogue behaviour
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Phrase that ends the session (case-insensitive substring)
    pub quit_keyword: String,

    /// Phrases that start the order sub-dialogue
    pub order_triggers: Vec<String>,

    /// Listen cycles allowed per order slot before abandoning
    pub slot_attempts: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            quit_keyword: DEFAULT_QUIT_KEYWORD.to_string(),
            order_triggers: vec!["order pizza".to_string(), "order a pizza".to_string()],
            slot_attempts: DEFAULT_SLOT_ATTEMPTS,
        }
    }
}

/// Ordering gateway client configuration
#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// Base URL of the ordering microservice
    pub gateway_url: String,

    /// Timeout applied to every outbound HTTP request
    pub timeout: Duration,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            gateway_url: format!("http://127.0.0.1:{DEFAULT_SERVER_PORT}"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Vendor backend used by the ordering microservice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VendorKind {
    /// Offline vendor with deterministic stores
    #[default]
    Demo,
    /// Domino's online ordering API
    Dominos,
}

impl VendorKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "dominos" => Ok(Self::Dominos),
            other => Err(Error::Config(format!("unknown vendor: {other}"))),
        }
    }
}

/// Ordering microservice configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub vendor: VendorKind,
    pub vendor_url: String,
    /// Vendor market code (e.g. "us", "ca")
    pub country: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            vendor: VendorKind::Demo,
            vendor_url: "https://order.dominos.com".to_string(),
            country: "us".to_string(),
        }
    }
}

/// Default artifact location: `~/.cache/pizza-assistant/reply.mp3`
/// Parse a numeric environment override, naming the variable on failure
fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {key} {value:?}: {e}")))
}

fn default_artifact_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".cache/pizza-assistant/reply.mp3"),
        |d| d.cache_dir().join("pizza-assistant").join("reply.mp3"),
    )
}

impl Config {
    /// Load configuration from the process environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn resolve(fc: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = |key: &str, file_value: Option<String>| {
            env(key)
                .or(file_value)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };

        let api_keys = ApiKeys {
            openai: secret("OPENAI_API_KEY", fc.api_keys.openai),
            elevenlabs: secret("ELEVENLABS_API_KEY", fc.api_keys.elevenlabs),
            deepgram: secret("DEEPGRAM_API_KEY", fc.api_keys.deepgram),
        };

        let voice_defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            stt_provider: env("PIZZA_STT_PROVIDER")
                .or(fc.voice.stt_provider)
                .map(|v| SttProviderKind::parse(&v))
                .transpose()?
                .unwrap_or(voice_defaults.stt_provider),
            stt_model: env("PIZZA_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(voice_defaults.stt_model),
            tts_provider: env("PIZZA_TTS_PROVIDER")
                .or(fc.voice.tts_provider)
                .map(|v| TtsProviderKind::parse(&v))
                .transpose()?
                .unwrap_or(voice_defaults.tts_provider),
            tts_model: env("PIZZA_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or(voice_defaults.tts_model),
            tts_voice: env("PIZZA_TTS_VOICE")
                .or(fc.voice.tts_voice)
                .unwrap_or(voice_defaults.tts_voice),
            tts_speed: fc.voice.tts_speed.unwrap_or(voice_defaults.tts_speed),
            max_listen: fc
                .voice
                .max_listen_secs
                .map_or(voice_defaults.max_listen, Duration::from_secs),
            artifact_path: env("PIZZA_ARTIFACT_PATH")
                .or(fc.voice.artifact_path)
                .map_or(voice_defaults.artifact_path, PathBuf::from),
        };

        let llm_defaults = LlmConfig::default();
        let llm = LlmConfig {
            model: env("PIZZA_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or(llm_defaults.model),
            base_url: env("PIZZA_LLM_BASE_URL")
                .or(fc.llm.base_url)
                .unwrap_or(llm_defaults.base_url),
            max_tokens: fc.llm.max_tokens.unwrap_or(llm_defaults.max_tokens),
            system_prompt: fc.llm.system_prompt.unwrap_or(llm_defaults.system_prompt),
        };

        let dialogue_defaults = DialogueConfig::default();
        let dialogue = DialogueConfig {
            quit_keyword: env("PIZZA_QUIT_KEYWORD")
                .or(fc.dialogue.quit_keyword)
                .unwrap_or(dialogue_defaults.quit_keyword),
            order_triggers: fc
                .dialogue
                .order_triggers
                .unwrap_or(dialogue_defaults.order_triggers),
            slot_attempts: fc
                .dialogue
                .slot_attempts
                .unwrap_or(dialogue_defaults.slot_attempts),
        };

        let order_defaults = OrderConfig::default();
        let order = OrderConfig {
            gateway_url: env("PIZZA_GATEWAY_URL")
                .or(fc.order.gateway_url)
                .unwrap_or(order_defaults.gateway_url),
            timeout: env("PIZZA_TIMEOUT_SECS")
                .map(|v| parse_env("PIZZA_TIMEOUT_SECS", &v))
                .transpose()?
                .or(fc.order.timeout_secs)
                .map_or(order_defaults.timeout, Duration::from_secs),
        };

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            port: env("PIZZA_PORT")
                .map(|v| parse_env("PIZZA_PORT", &v))
                .or_else(|| env("PORT").map(|v| parse_env("PORT", &v)))
                .transpose()?
                .or(fc.server.port)
                .unwrap_or(server_defaults.port),
            vendor: env("PIZZA_VENDOR")
                .or(fc.server.vendor)
                .map(|v| VendorKind::parse(&v))
                .transpose()?
                .unwrap_or(server_defaults.vendor),
            vendor_url: env("PIZZA_VENDOR_URL")
                .or(fc.server.vendor_url)
                .unwrap_or(server_defaults.vendor_url),
            country: fc.server.country.unwrap_or(server_defaults.country),
        };

        let config = Self {
            api_keys,
            voice,
            llm,
            dialogue,
            order,
            server,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.dialogue.quit_keyword.trim().is_empty() {
            return Err(Error::Config("dialogue.quit_keyword must not be empty".to_string()));
        }
        if self.dialogue.order_triggers.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::Config(
                "dialogue.order_triggers needs at least one phrase".to_string(),
            ));
        }
        if self.dialogue.slot_attempts == 0 {
            return Err(Error::Config("dialogue.slot_attempts must be at least 1".to_string()));
        }
        if !(0.25..=4.0).contains(&self.voice.tts_speed) {
            return Err(Error::Config(format!(
                "voice.tts_speed {} outside 0.25..=4.0",
                self.voice.tts_speed
            )));
        }
        if self.voice.max_listen.is_zero() || self.voice.max_listen > MAX_LISTEN_LIMIT {
            return Err(Error::Config(format!(
                "voice.max_listen_secs must be between 1 and {}",
                MAX_LISTEN_LIMIT.as_secs()
            )));
        }
        if self.order.timeout.is_zero() {
            return Err(Error::Config("order.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Build an HTTP client carrying the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.order.timeout)
            .build()?)
    }
}
