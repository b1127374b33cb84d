//! Tone Synthesizer
//!
//! Pure sine-tone generation for fallback cues. Buffers are interleaved
//! signed 16-bit PCM, by default 22050 Hz stereo.

pub mod wav;

pub use wav::{render_default_cues, write_sequence_wav};

use crate::cues::ToneSequence;
use std::f32::consts::PI;
use std::time::Duration;

/// Default synthesis sample rate (22.05 kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

/// Default channel count (stereo)
pub const DEFAULT_CHANNELS: u16 = 2;

/// Peak amplitude of a synthesized tone (full scale)
const AMPLITUDE: f32 = i16::MAX as f32;

/// Interleaved PCM buffer for one tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneBuffer {
    /// Interleaved samples
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
}

impl ToneBuffer {
    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Playback length of the buffer
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }
}

/// Stateless sine tone generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSynth {
    sample_rate: u32,
    channels: u16,
}

impl ToneSynth {
    /// Create a synthesizer with an explicit output format
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        ToneSynth {
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames a tone of `duration_ms` occupies
    pub fn frames_for(&self, duration_ms: u32) -> usize {
        (self.sample_rate as u64 * duration_ms as u64 / 1000) as usize
    }

    /// Synthesize a sine tone, duplicated across all channels
    pub fn synthesize(&self, frequency_hz: u32, duration_ms: u32) -> ToneBuffer {
        let frames = self.frames_for(duration_ms);
        let step = 2.0 * PI * frequency_hz as f32 / self.sample_rate as f32;
        let mut samples = Vec::with_capacity(frames * self.channels as usize);

        for n in 0..frames {
            // Wrap the phase per frame to keep f32 precision on long tones
            let phase = (step * n as f32) % (2.0 * PI);
            let value = (phase.sin() * AMPLITUDE) as i16;
            for _ in 0..self.channels {
                samples.push(value);
            }
        }

        ToneBuffer {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Silence of `duration_ms`, in the same format as tones
    pub fn silence(&self, duration_ms: u32) -> ToneBuffer {
        ToneBuffer {
            samples: vec![0; self.frames_for(duration_ms) * self.channels as usize],
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Flatten a whole sequence, gaps included, into one buffer
    pub fn render_sequence(&self, sequence: &ToneSequence) -> ToneBuffer {
        let mut samples = Vec::new();
        for tone in sequence.tones() {
            samples.extend(self.synthesize(tone.frequency_hz, tone.duration_ms).samples);
            samples.extend(self.silence(tone.gap_ms).samples);
        }
        ToneBuffer {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

impl Default for ToneSynth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS)
    }
}
