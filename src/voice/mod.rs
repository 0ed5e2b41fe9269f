//! Voice processing module
//!
//! Microphone capture, utterance segmentation, remote STT/TTS and playback,
//! exposed to the dialogue through [`SpeechInput`] and [`SpeechOutput`].

mod capture;
mod input;
mod output;
mod playback;
mod stt;
mod tts;
mod utterance;

pub use capture::{AudioCapture, SAMPLE_RATE, rms, samples_to_wav};
pub use input::{ConsoleInput, MicrophoneInput, SpeechInput};
pub use output::{ConsoleOutput, SpeakerOutput, SpeechOutput, store_artifact};
pub use playback::{AudioPlayback, PLAYBACK_SAMPLE_RATE, decode_mp3};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use utterance::{DetectorState, UtteranceDetector};
