//! Audio playback to speakers

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches `OpenAI` TTS output)
pub const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Plays audio to the default output device
pub struct AudioPlayback {
    device: Device,
    config: StreamConfig,
}

impl AudioPlayback {
    /// Open the default output device at [`PLAYBACK_SAMPLE_RATE`]
    ///
    /// # Errors
    ///
    /// Returns error if no output device supports the playback rate
    pub fn new() -> Result<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supports_rate = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
        };

        // Prefer mono, fall back to stereo
        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| c.channels() == 1 && supports_rate(c))
            .or_else(|| {
                device
                    .supported_output_configs()
                    .ok()?
                    .find(|c| c.channels() == 2 && supports_rate(c))
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { device, config })
    }

    /// Play mono samples at [`PLAYBACK_SAMPLE_RATE`], blocking until done
    ///
    /// # Errors
    ///
    /// Returns error if the output stream fails
    pub fn play(&self, samples: Vec<f32>) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let channels = usize::from(self.config.channels);
        let sample_count = samples.len();
        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stream = {
            let samples = Arc::clone(&samples);
            let position = Arc::clone(&position);
            let finished = Arc::clone(&finished);
            self.device
                .build_output_stream(
                    &self.config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        for frame in data.chunks_mut(channels) {
                            let pos = position.load(Ordering::Relaxed);
                            let sample = samples.get(pos).copied().unwrap_or_else(|| {
                                finished.store(true, Ordering::Relaxed);
                                0.0
                            });
                            frame.fill(sample);
                            if pos < samples.len() {
                                position.store(pos + 1, Ordering::Relaxed);
                            }
                        }
                    },
                    |err| {
                        tracing::error!(error = %err, "audio playback error");
                    },
                    None,
                )
                .map_err(|e| Error::Audio(e.to_string()))?
        };

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        let duration_ms = (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE);
        let deadline = Instant::now() + Duration::from_millis(duration_ms + 500);

        while !finished.load(Ordering::Relaxed) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }

        // Let the device drain its last buffer
        std::thread::sleep(Duration::from_millis(100));

        drop(stream);
        tracing::debug!(samples = sample_count, "playback complete");

        Ok(())
    }

    /// Decode and play MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if decoding, resampling or playback fails
    pub fn play_mp3(&self, mp3_data: &[u8]) -> Result<()> {
        let (samples, rate) = decode_mp3(mp3_data)?;
        let samples = if rate == PLAYBACK_SAMPLE_RATE || rate == 0 {
            samples
        } else {
            resample(&samples, rate, PLAYBACK_SAMPLE_RATE)?
        };
        self.play(samples)
    }
}

/// Decode MP3 bytes to mono f32 samples and their sample rate
///
/// # Errors
///
/// Returns error if a frame cannot be decoded
pub fn decode_mp3(mp3_data: &[u8]) -> Result<(Vec<f32>, u32)> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = u32::try_from(frame.sample_rate).unwrap_or(PLAYBACK_SAMPLE_RATE);
                if frame.channels == 2 {
                    samples.extend(frame.data.chunks(2).map(|pair| {
                        let left = f32::from(pair[0]) / 32768.0;
                        let right = f32::from(pair.get(1).copied().unwrap_or(pair[0])) / 32768.0;
                        f32::midpoint(left, right)
                    }));
                } else {
                    samples.extend(frame.data.iter().map(|&s| f32::from(s) / 32768.0));
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok((samples, sample_rate))
}

/// Resample mono audio with rubato, zero-padding the final chunk
#[allow(clippy::cast_possible_truncation)]
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    use rubato::{FftFixedIn, Resampler};

    let mut resampler =
        FftFixedIn::<f64>::new(from_rate as usize, to_rate as usize, 1024, 2, 1)
            .map_err(|e| Error::Audio(format!("resampler init failed: {e}")))?;

    // The resampler may round the requested chunk size
    let chunk_size = resampler.input_frames_next();
    let mut output = Vec::with_capacity(samples.len() * to_rate as usize / from_rate as usize);

    for chunk in samples.chunks(chunk_size) {
        let mut block: Vec<f64> = chunk.iter().map(|&s| f64::from(s)).collect();
        block.resize(chunk_size, 0.0);
        let result = resampler
            .process(&[block], None)
            .map_err(|e| Error::Audio(format!("resample failed: {e}")))?;
        output.extend(result[0].iter().map(|&s| s as f32));
    }

    Ok(output)
}
