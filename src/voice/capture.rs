//! Audio capture from microphone

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Captures mono audio from the default input device
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Open the default input device at [`SAMPLE_RATE`]
    ///
    /// # Errors
    ///
    /// Returns error if no input device supports mono capture at 16kHz
    pub fn new() -> Result<Self> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported.with_sample_rate(SampleRate(SAMPLE_RATE)).config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start filling the buffer; a no-op when already running
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be built or started
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop capturing and drop the stream
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("audio capture stopped");
        }
    }

    /// Take everything captured since the last drain
    #[must_use]
    pub fn drain(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// RMS level and peak of the samples currently buffered
    #[must_use]
    pub fn level(&self) -> (f32, f32) {
        self.buffer.lock().map_or((0.0, 0.0), |buf| {
            let peak = buf.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
            (rms(&buf), peak)
        })
    }

    /// Discard buffered samples
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Check if currently capturing
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }
}

/// Root-mean-square energy of a block of samples
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Encode f32 samples as 16-bit mono WAV for STT APIs
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        assert!(rms(&[]) < f32::EPSILON);
        assert!(rms(&[0.0; 64]) < 0.001);
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_wav_header_and_length() {
        let samples = vec![0.25f32; 1600];
        let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.len(), 1600);
    }

    #[test]
    fn test_wav_clamps_out_of_range() {
        let wav = samples_to_wav(&[2.0, -2.0], SAMPLE_RATE).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![32767, -32768]);
    }
}
