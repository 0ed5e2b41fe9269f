//! Speech input adapters
//!
//! A listen cycle yields one utterance as text. Failures never escape: they
//! are logged and reported as an empty string.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use super::capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
use super::stt::SpeechToText;
use super::utterance::UtteranceDetector;
use crate::Result;
use crate::config::{Config, MAX_LISTEN_LIMIT};

/// How often the capture buffer is drained while listening
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Source of user utterances
#[async_trait(?Send)]
pub trait SpeechInput {
    /// Run one listen cycle
    ///
    /// Returns the recognized text, or an empty string if nothing usable
    /// was heard.
    async fn listen(&mut self) -> String;
}

/// Microphone capture followed by remote transcription
pub struct MicrophoneInput {
    capture: AudioCapture,
    detector: UtteranceDetector,
    stt: SpeechToText,
    max_listen: Duration,
}

impl MicrophoneInput {
    /// Open the default microphone and build the STT client
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened or STT is not configured
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            capture: AudioCapture::new()?,
            detector: UtteranceDetector::new(),
            stt: SpeechToText::from_config(config)?,
            max_listen: config
                .voice
                .max_listen
                .clamp(POLL_INTERVAL, MAX_LISTEN_LIMIT),
        })
    }

    /// Record until an utterance completes or the listen window closes
    async fn record(&mut self) -> Result<Option<Vec<f32>>> {
        self.detector.reset();
        self.capture.clear();
        self.capture.start()?;

        let deadline = Instant::now() + self.max_listen;
        while Instant::now() < deadline {
            tokio::time::sleep(POLL_INTERVAL).await;
            self.detector.push(&self.capture.drain());
            if self.detector.is_complete() {
                break;
            }
        }

        self.capture.stop();

        // Keep speech cut off by the deadline
        if self.detector.has_speech() {
            Ok(Some(self.detector.take()))
        } else {
            tracing::debug!(window = ?self.max_listen, "no speech in listen window");
            Ok(None)
        }
    }

    async fn listen_inner(&mut self) -> Result<String> {
        let Some(samples) = self.record().await? else {
            return Ok(String::new());
        };

        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        self.stt.transcribe(&wav).await
    }
}

#[async_trait(?Send)]
impl SpeechInput for MicrophoneInput {
    async fn listen(&mut self) -> String {
        match self.listen_inner().await {
            Ok(text) => text,
            Err(e) => {
                self.capture.stop();
                tracing::warn!(error = %e, "speech recognition failed");
                String::new()
            }
        }
    }
}

/// Typed input, one line per utterance
///
/// End of input is reported as the quit phrase so the dialogue ends cleanly.
pub struct ConsoleInput<R = BufReader<Stdin>> {
    reader: R,
    quit_keyword: String,
    prompt: bool,
}

impl ConsoleInput {
    /// Read utterances from standard input
    #[must_use]
    pub fn stdin(quit_keyword: &str) -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            quit_keyword: quit_keyword.to_string(),
            prompt: true,
        }
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleInput<R> {
    /// Read utterances from any buffered reader
    pub fn from_reader(reader: R, quit_keyword: &str) -> Self {
        Self {
            reader,
            quit_keyword: quit_keyword.to_string(),
            prompt: false,
        }
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> SpeechInput for ConsoleInput<R> {
    async fn listen(&mut self) -> String {
        if self.prompt {
            print!("you> ");
            let _ = std::io::Write::flush(&mut std::io::stdout());
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => {
                tracing::debug!("input closed");
                self.quit_keyword.clone()
            }
            Ok(_) => line.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                String::new()
            }
        }
    }
}
