//! Silent audio sink
//!
//! Records what would have been played instead of producing sound. Used
//! for `--mute` runs on machines without an audio device, and by tests.
//! Assets are still validated as WAV files so load failures behave the
//! same as on a real device.

use super::AudioSink;
use crate::cues::Tone;
use crate::synth::ToneBuffer;
use crate::{Result, TossCueError};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// One recorded sink operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// A sound asset played
    Sound(PathBuf),
    /// A synthesized tone played
    Tone {
        /// Tone frequency in Hz
        frequency_hz: u32,
        /// Tone length in milliseconds
        duration_ms: u32,
        /// Frames in the synthesized buffer
        frames: usize,
    },
    /// Silence between tones
    Gap(Duration),
}

/// A decoded WAV asset
#[derive(Debug, Clone)]
pub struct RecordedSound {
    path: PathBuf,
    duration: Duration,
}

/// Audio sink that records calls instead of playing them.
///
/// Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    fail_tones: bool,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every tone playback fail
    pub fn fail_tones(mut self, fail: bool) -> Self {
        self.fail_tones = fail;
        self
    }

    /// Snapshot of recorded calls
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    /// Frequencies of recorded tones, in order
    pub fn tone_frequencies(&self) -> Vec<u32> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Tone { frequency_hz, .. } => Some(*frequency_hz),
                _ => None,
            })
            .collect()
    }

    /// Forget all recorded calls
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl AudioSink for RecordingSink {
    type Sound = RecordedSound;

    fn load_sound(&mut self, path: &Path) -> Result<RecordedSound> {
        let reader = hound::WavReader::open(path).map_err(|e| TossCueError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let spec = reader.spec();
        let seconds = reader.duration() as f64 / spec.sample_rate.max(1) as f64;
        Ok(RecordedSound {
            path: path.to_path_buf(),
            duration: Duration::from_secs_f64(seconds),
        })
    }

    fn play_sound(&mut self, sound: &RecordedSound) -> Result<Duration> {
        self.calls.lock().push(SinkCall::Sound(sound.path.clone()));
        Ok(sound.duration)
    }

    fn play_tone(&mut self, tone: &Tone, buffer: &ToneBuffer) -> Result<()> {
        if self.fail_tones {
            return Err(TossCueError::AssetPlayback("tone output disabled".into()));
        }
        self.calls.lock().push(SinkCall::Tone {
            frequency_hz: tone.frequency_hz,
            duration_ms: tone.duration_ms,
            frames: buffer.frames(),
        });
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        self.calls.lock().push(SinkCall::Gap(duration));
    }
}
