//! End-of-utterance detection
//!
//! Energy-based segmentation: one utterance is speech followed by enough
//! trailing silence. Bounds a single listen cycle before audio goes to STT.

use super::capture::{SAMPLE_RATE, rms};

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech to accept (0.3 seconds at 16kHz)
const MIN_SPEECH_SAMPLES: usize = SAMPLE_RATE as usize * 3 / 10;

/// Trailing silence that ends an utterance (0.8 seconds at 16kHz)
const SILENCE_SAMPLES: usize = SAMPLE_RATE as usize * 8 / 10;

/// State of the utterance detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for speech
    Idle,
    /// Speech started, accumulating
    Speaking,
    /// Speech followed by silence; utterance ready
    Complete,
}

/// Segments a stream of audio blocks into one utterance
#[derive(Debug)]
pub struct UtteranceDetector {
    state: DetectorState,
    threshold: f32,
    speech: Vec<f32>,
    voiced_samples: usize,
    silence_counter: usize,
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceDetector {
    /// Create a detector with the default energy threshold
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(ENERGY_THRESHOLD)
    }

    /// Create a detector with a custom energy threshold
    #[must_use]
    pub const fn with_threshold(threshold: f32) -> Self {
        Self {
            state: DetectorState::Idle,
            threshold,
            speech: Vec::new(),
            voiced_samples: 0,
            silence_counter: 0,
        }
    }

    /// Feed one block of samples; returns the state after the block
    pub fn push(&mut self, block: &[f32]) -> DetectorState {
        if block.is_empty() {
            return self.state;
        }

        let energy = rms(block);
        let is_speech = energy > self.threshold;

        match self.state {
            DetectorState::Idle => {
                if is_speech {
                    self.state = DetectorState::Speaking;
                    self.speech.extend_from_slice(block);
                    self.voiced_samples = block.len();
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            DetectorState::Speaking => {
                self.speech.extend_from_slice(block);

                if is_speech {
                    self.voiced_samples += block.len();
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += block.len();
                }

                if self.silence_counter > SILENCE_SAMPLES {
                    if self.voiced_samples >= MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.speech.len(), "utterance complete");
                        self.state = DetectorState::Complete;
                    } else {
                        // A click or cough, not speech
                        tracing::trace!(voiced = self.voiced_samples, "discarding short burst");
                        self.reset();
                    }
                }
            }
            DetectorState::Complete => {}
        }

        self.state
    }

    /// Whether an utterance has been captured
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == DetectorState::Complete
    }

    /// Whether any speech has started
    #[must_use]
    pub fn has_speech(&self) -> bool {
        self.state != DetectorState::Idle
    }

    /// Take the captured audio and reset to idle
    pub fn take(&mut self) -> Vec<f32> {
        let speech = std::mem::take(&mut self.speech);
        self.reset();
        speech
    }

    /// Reset detector to idle state
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
        self.speech.clear();
        self.voiced_samples = 0;
        self.silence_counter = 0;
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 1600;

    fn loud() -> Vec<f32> {
        vec![0.2; BLOCK]
    }

    fn quiet() -> Vec<f32> {
        vec![0.0; BLOCK]
    }

    #[test]
    fn test_silence_stays_idle() {
        let mut detector = UtteranceDetector::new();
        for _ in 0..20 {
            assert_eq!(detector.push(&quiet()), DetectorState::Idle);
        }
        assert!(!detector.has_speech());
    }

    #[test]
    fn test_speech_then_silence_completes() {
        let mut detector = UtteranceDetector::new();
        for _ in 0..5 {
            detector.push(&loud());
        }
        assert_eq!(detector.state(), DetectorState::Speaking);

        for _ in 0..10 {
            detector.push(&quiet());
        }
        assert!(detector.is_complete());

        let audio = detector.take();
        assert_eq!(audio.len(), 14 * BLOCK);
        assert_eq!(detector.state(), DetectorState::Idle);
    }

    #[test]
    fn test_short_burst_discarded() {
        let mut detector = UtteranceDetector::new();
        detector.push(&loud()[..800]);
        for _ in 0..10 {
            detector.push(&quiet());
        }
        assert_eq!(detector.state(), DetectorState::Idle);
        assert!(detector.take().is_empty());
    }

    #[test]
    fn test_custom_threshold() {
        let mut detector = UtteranceDetector::with_threshold(0.5);
        assert_eq!(detector.push(&loud()), DetectorState::Idle);
    }
}
