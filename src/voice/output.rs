//! Speech output adapters

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::playback::AudioPlayback;
use super::tts::TextToSpeech;
use crate::Result;
use crate::config::Config;

/// Sink for assistant replies
///
/// Implementations absorb their own failures.
#[async_trait(?Send)]
pub trait SpeechOutput {
    /// Render one reply to the user
    async fn speak(&mut self, text: &str);
}

/// Remote synthesis, stored to the artifact file, then played
pub struct SpeakerOutput {
    tts: TextToSpeech,
    playback: AudioPlayback,
    artifact_path: PathBuf,
}

impl SpeakerOutput {
    /// Build the TTS client and open the default output device
    ///
    /// # Errors
    ///
    /// Returns error if TTS is not configured or the device cannot be opened
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            tts: TextToSpeech::from_config(config)?,
            playback: AudioPlayback::new()?,
            artifact_path: config.voice.artifact_path.clone(),
        })
    }

    async fn speak_inner(&self, text: &str) -> Result<()> {
        let audio = self.tts.synthesize(text).await?;
        store_artifact(&self.artifact_path, &audio)?;
        self.playback.play_mp3(&audio)
    }
}

#[async_trait(?Send)]
impl SpeechOutput for SpeakerOutput {
    async fn speak(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        tracing::debug!(text, "speaking");
        if let Err(e) = self.speak_inner(text).await {
            tracing::error!(error = %e, "speech output failed");
        }
    }
}

/// Write synthesized audio to disk, replacing the previous reply
///
/// # Errors
///
/// Returns error if the directory or file cannot be written
pub fn store_artifact(path: &Path, audio: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, audio)?;
    tracing::debug!(path = %path.display(), bytes = audio.len(), "stored reply audio");
    Ok(())
}

/// Prints replies instead of speaking them
#[derive(Debug, Default)]
pub struct ConsoleOutput;

#[async_trait(?Send)]
impl SpeechOutput for ConsoleOutput {
    async fn speak(&mut self, text: &str) {
        if !text.trim().is_empty() {
            println!("assistant> {text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_artifact_creates_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reply.mp3");

        store_artifact(&path, b"first").unwrap();
        store_artifact(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
