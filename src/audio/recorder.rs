//! Push-to-talk microphone recorder using cpal.
//!
//! Captures at the device's native sample rate while recording, then
//! downmixes to mono, downsamples to 16kHz, and encodes a 16-bit PCM
//! WAV clip on stop — the shape the transcription collaborator expects.

use crate::error::{ChatError, Result};
use cpal::StreamConfig;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Sample rate of encoded clips.
const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A finished recording, encoded as a WAV file in memory.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Complete RIFF/WAV file contents (16-bit PCM mono).
    pub wav_bytes: Vec<u8>,
    /// Sample rate of the encoded audio.
    pub sample_rate: u32,
    /// Clip length in seconds.
    pub duration_secs: f32,
}

/// One active recording: the live stream plus its chunk buffer.
struct ActiveRecording {
    stream: cpal::Stream,
    chunks: Arc<Mutex<Vec<Vec<f32>>>>,
    native_rate: u32,
    native_channels: u16,
}

/// Microphone recorder with an Idle → Recording → Idle lifecycle.
///
/// `stop()` releases the capture stream exactly once per recording —
/// whatever later happens to the returned clip, the microphone
/// indicator goes dark here.
#[derive(Default)]
pub struct Recorder {
    active: Option<ActiveRecording>,
}

impl Recorder {
    /// Create an idle recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a recording is in progress.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start capturing from the default input device.
    ///
    /// Chunks accumulate in arrival order until [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidState`] if already recording, and
    /// [`ChatError::PermissionDenied`] if no input device is available
    /// or the capture stream cannot be opened — the recorder stays idle.
    pub fn start(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Err(ChatError::InvalidState(
                "recording already in progress".to_owned(),
            ));
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| ChatError::PermissionDenied("no default input device".to_owned()))?;

        let device_name = device
            .description()
            .map(|d| d.name().to_owned())
            .unwrap_or_else(|_| "<unknown>".into());

        // Use the device's default config for best compatibility and
        // resample in software on stop.
        let default_config = device
            .default_input_config()
            .map_err(|e| ChatError::PermissionDenied(format!("no usable input config: {e}")))?;
        let native_rate = default_config.sample_rate();
        let native_channels = default_config.channels();

        let stream_config = StreamConfig {
            channels: native_channels,
            sample_rate: native_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let chunks: Arc<Mutex<Vec<Vec<f32>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&chunks);

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                    if let Ok(mut buffer) = sink.lock() {
                        buffer.push(data.to_vec());
                    }
                },
                move |err| {
                    warn!("input stream error: {err}");
                },
                None,
            )
            .map_err(|e| {
                ChatError::PermissionDenied(format!("cannot open input stream: {e}"))
            })?;

        stream
            .play()
            .map_err(|e| ChatError::PermissionDenied(format!("cannot start input stream: {e}")))?;

        info!(
            "recording started on '{device_name}': {}Hz, {} channels",
            native_rate, native_channels
        );

        self.active = Some(ActiveRecording {
            stream,
            chunks,
            native_rate,
            native_channels,
        });
        Ok(())
    }

    /// Stop recording and return the encoded clip.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidState`] when no recording is active,
    /// or [`ChatError::Audio`] if the clip cannot be encoded. The
    /// capture stream is released before encoding is attempted.
    pub fn stop(&mut self) -> Result<AudioClip> {
        let recording = self
            .active
            .take()
            .ok_or_else(|| ChatError::InvalidState("no active recording".to_owned()))?;

        // Device release: dropping the stream ends the capture session.
        drop(recording.stream);

        let chunks = match recording.chunks.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        let mut samples = Vec::with_capacity(chunks.iter().map(Vec::len).sum());
        for chunk in chunks {
            samples.extend(chunk);
        }

        let mono = if recording.native_channels > 1 {
            to_mono(&samples, recording.native_channels)
        } else {
            samples
        };
        let resampled = if recording.native_rate == TARGET_SAMPLE_RATE {
            mono
        } else {
            downsample(&mono, recording.native_rate, TARGET_SAMPLE_RATE)
        };

        let duration_secs = resampled.len() as f32 / TARGET_SAMPLE_RATE as f32;
        let wav_bytes = encode_wav(&resampled, TARGET_SAMPLE_RATE)?;
        info!("recording stopped: {duration_secs:.1}s captured");

        Ok(AudioClip {
            wav_bytes,
            sample_rate: TARGET_SAMPLE_RATE,
            duration_secs,
        })
    }

    /// List available input devices.
    ///
    /// # Errors
    ///
    /// Returns an error if devices cannot be enumerated.
    pub fn list_input_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| ChatError::Audio(format!("cannot enumerate devices: {e}")))?;

        let mut names = Vec::new();
        for device in devices {
            if let Ok(desc) = device.description() {
                names.push(desc.name().to_owned());
            }
        }
        Ok(names)
    }
}

/// Convert interleaved multi-channel audio to mono by averaging channels.
fn to_mono(data: &[f32], channels: u16) -> Vec<f32> {
    let ch = channels as usize;
    data.chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Simple linear-interpolation downsampler.
///
/// Speech energy sits below 8kHz, so no anti-alias filter is needed for
/// a capture-rate → 16kHz conversion.
fn downsample(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = src_rate as f64 / dst_rate as f64;
    let out_len = (samples.len() as f64 / ratio) as usize;
    let mut output = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            samples[idx] as f64 * (1.0 - frac) + samples[idx + 1] as f64 * frac
        } else {
            samples[idx.min(samples.len() - 1)] as f64
        };

        output.push(sample as f32);
    }

    output
}

/// Encode f32 samples as an in-memory 16-bit PCM mono WAV file.
fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| ChatError::Audio(format!("cannot create WAV writer: {e}")))?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(value)
            .map_err(|e| ChatError::Audio(format!("WAV write failed: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| ChatError::Audio(format!("WAV finalize failed: {e}")))?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn stop_without_start_is_invalid_state() {
        let mut recorder = Recorder::new();
        let err = recorder.stop().unwrap_err();
        assert!(matches!(err, ChatError::InvalidState(_)));
    }

    #[test]
    fn new_recorder_is_idle() {
        let recorder = Recorder::new();
        assert!(!recorder.is_recording());
    }

    #[test]
    fn to_mono_averages_channels() {
        let interleaved = [0.0, 1.0, 0.5, 0.5, -1.0, 1.0];
        let mono = to_mono(&interleaved, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downsample_halves_length_for_double_rate() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let out = downsample(&samples, 32_000, 16_000);
        assert_eq!(out.len(), 500);
    }

    #[test]
    fn downsample_same_rate_is_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downsample(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn encode_wav_produces_readable_file() {
        let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let bytes = encode_wav(&samples, TARGET_SAMPLE_RATE).unwrap();

        let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, TARGET_SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), samples.len() as u32);
    }

    #[test]
    fn encode_wav_clamps_out_of_range_samples() {
        let bytes = encode_wav(&[2.0, -2.0], TARGET_SAMPLE_RATE).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![i16::MAX, i16::MIN + 1]);
    }
}
