//! TOML configuration file loading
//!
//! Supports `~/.config/pizza-assistant/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Language-model configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Dialogue behaviour
    #[serde(default)]
    pub dialogue: DialogueFileConfig,

    /// Ordering gateway client configuration
    #[serde(default)]
    pub order: OrderFileConfig,

    /// Ordering microservice configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
    pub deepgram: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT backend ("whisper" or "deepgram")
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS backend ("openai" or "elevenlabs")
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,

    /// Upper bound on a single listen cycle
    pub max_listen_secs: Option<u64>,

    /// Where the synthesized reply is written before playback
    pub artifact_path: Option<String>,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

/// Dialogue configuration
#[derive(Debug, Default, Deserialize)]
pub struct DialogueFileConfig {
    pub quit_keyword: Option<String>,
    pub order_triggers: Option<Vec<String>>,
    pub slot_attempts: Option<u32>,
}

/// Ordering gateway client configuration
#[derive(Debug, Default, Deserialize)]
pub struct OrderFileConfig {
    pub gateway_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Ordering microservice configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    pub port: Option<u16>,
    /// Vendor backend ("demo" or "dominos")
    pub vendor: Option<String>,
    pub vendor_url: Option<String>,
    pub country: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConfigFile {
    config_file_path().map_or_else(ConfigFile::default, |path| load_config_file_from(&path))
}

/// Load a TOML config file from an explicit path
///
/// Missing or malformed files fall back to defaults with a warning.
pub fn load_config_file_from(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/pizza-assistant/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("pizza-assistant").join("config.toml"))
}
