//! Speech-to-text (STT) processing

use secrecy::{ExposeSecret, SecretString};

use crate::config::{Config, SttProviderKind};
use crate::{Error, Result};

/// Response from `OpenAI` Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Response from Deepgram transcription API
#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

/// Transcribes speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    provider: SttProviderKind,
}

impl SpeechToText {
    /// Create an STT instance from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the selected provider has no API key
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = config.http_client()?;
        let model = config.voice.stt_model.clone();

        match config.voice.stt_provider {
            SttProviderKind::Whisper => {
                let key = config.api_keys.openai.clone().ok_or_else(|| {
                    Error::Config("OpenAI API key required for Whisper".to_string())
                })?;
                Ok(Self::new(client, key, model, SttProviderKind::Whisper))
            }
            SttProviderKind::Deepgram => {
                let key = config
                    .api_keys
                    .deepgram
                    .clone()
                    .ok_or_else(|| Error::Config("Deepgram API key required".to_string()))?;
                Ok(Self::new(client, key, model, SttProviderKind::Deepgram))
            }
        }
    }

    /// Create an STT instance with an explicit client
    #[must_use]
    pub const fn new(
        client: reqwest::Client,
        api_key: SecretString,
        model: String,
        provider: SttProviderKind,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            provider,
        }
    }

    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - WAV audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        match self.provider {
            SttProviderKind::Whisper => self.transcribe_whisper(audio).await,
            SttProviderKind::Deepgram => self.transcribe_deepgram(audio).await,
        }
    }

    /// Transcribe using `OpenAI` Whisper
    async fn transcribe_whisper(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            e
        })?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text.trim().to_string())
    }

    /// Transcribe using Deepgram
    async fn transcribe_deepgram(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Deepgram transcription");

        let url = format!(
            "https://api.deepgram.com/v1/listen?model={}&punctuate=true",
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key.expose_secret()))
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Deepgram request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Deepgram API error");
            return Err(Error::Stt(format!("Deepgram API error {status}: {body}")));
        }

        let result: DeepgramResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Deepgram response");
            e
        })?;

        let transcript = first_transcript(result);

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}

fn first_transcript(response: DeepgramResponse) -> String {
    response
        .results
        .channels
        .into_iter()
        .next()
        .and_then(|c| c.alternatives.into_iter().next())
        .map(|a| a.transcript.trim().to_string())
        .unwrap_or_default()
}
