//! Text-to-speech (TTS) processing

use secrecy::{ExposeSecret, SecretString};

use crate::config::{Config, TtsProviderKind};
use crate::{Error, Result};

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    voice: String,
    speed: f32,
    model: String,
    provider: TtsProviderKind,
}

impl TextToSpeech {
    /// Create a TTS instance from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the selected provider has no API key
    pub fn from_config(config: &Config) -> Result<Self> {
        let voice = &config.voice;
        let api_key = match voice.tts_provider {
            TtsProviderKind::OpenAI => config
                .api_keys
                .openai
                .clone()
                .ok_or_else(|| Error::Config("OpenAI API key required for TTS".to_string()))?,
            TtsProviderKind::ElevenLabs => config.api_keys.elevenlabs.clone().ok_or_else(|| {
                Error::Config("ElevenLabs API key required for TTS".to_string())
            })?,
        };

        Ok(Self {
            client: config.http_client()?,
            api_key,
            voice: voice.tts_voice.clone(),
            // ElevenLabs doesn't use speed in the same way
            speed: match voice.tts_provider {
                TtsProviderKind::OpenAI => voice.tts_speed,
                TtsProviderKind::ElevenLabs => 1.0,
            },
            model: voice.tts_model.clone(),
            provider: voice.tts_provider,
        })
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if the text is empty or synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(Error::Tts("refusing to synthesize empty text".to_string()));
        }

        tracing::debug!(chars = text.len(), provider = ?self.provider, "synthesizing speech");
        match self.provider {
            TtsProviderKind::OpenAI => self.synthesize_openai(text).await,
            TtsProviderKind::ElevenLabs => self.synthesize_elevenlabs(text).await,
        }
    }

    /// Synthesize using `OpenAI` TTS
    async fn synthesize_openai(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }

    /// Synthesize using `ElevenLabs` TTS
    async fn synthesize_elevenlabs(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!("https://api.elevenlabs.io/v1/text-to-speech/{}", self.voice);

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_text_not_sent() {
        let config = Config {
            api_keys: crate::config::ApiKeys {
                openai: Some(SecretString::from("sk-test".to_string())),
                ..Default::default()
            },
            ..Default::default()
        };
        let tts = TextToSpeech::from_config(&config).unwrap();
        assert!(matches!(tts.synthesize("   ").await, Err(Error::Tts(_))));
    }

    #[test]
    fn test_elevenlabs_requires_key() {
        let mut config = Config::default();
        config.voice.tts_provider = TtsProviderKind::ElevenLabs;
        assert!(matches!(
            TextToSpeech::from_config(&config),
            Err(Error::Config(_))
        ));
    }
}
