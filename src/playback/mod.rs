//! Cue Player & Audio Device
//!
//! The player is the only component that touches audio output. It plays
//! the recorded asset for a cue when one exists and loads, and otherwise
//! falls back to the cue's synthesized tones. Audio failures are logged
//! and never propagate.

pub mod recording;
#[cfg(feature = "device")]
pub mod rodio_device;

pub use recording::{RecordingSink, SinkCall};
#[cfg(feature = "device")]
pub use rodio_device::RodioDevice;

use crate::cues::{CueLibrary, CueSpec, Tone, ToneSequence};
use crate::protocol::GameEvent;
use crate::synth::{ToneBuffer, ToneSynth};
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Audio output capability.
///
/// Every `play_*` call blocks until the audio has finished sounding, so
/// that cues from back-to-back events never overlap.
pub trait AudioSink {
    /// A decoded sound asset ready for playback
    type Sound;

    /// Load and decode a sound asset
    fn load_sound(&mut self, path: &Path) -> Result<Self::Sound>;

    /// Play a loaded asset, returning how long it sounded
    fn play_sound(&mut self, sound: &Self::Sound) -> Result<Duration>;

    /// Play one synthesized tone; `tone` describes what `buffer` holds
    fn play_tone(&mut self, tone: &Tone, buffer: &ToneBuffer) -> Result<()>;

    /// Stay silent for `duration`
    fn pause(&mut self, duration: Duration);
}

/// What the player ended up doing for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The event has no mapped cue; nothing was played
    NoCue,
    /// The recorded asset played
    Asset {
        /// Asset location
        path: PathBuf,
        /// How long it played
        duration: Duration,
    },
    /// The synthesized fallback sequence played
    Tones {
        /// Number of tones played
        count: usize,
    },
    /// Audio output failed; the error was logged
    Failed(String),
}

/// Resolves events to cues and plays them on an [`AudioSink`]
pub struct CuePlayer<S: AudioSink> {
    library: CueLibrary,
    synth: ToneSynth,
    sink: S,
}

impl<S: AudioSink> CuePlayer<S> {
    /// Create a player with the default synthesizer format
    pub fn new(library: CueLibrary, sink: S) -> Self {
        Self::with_synth(library, ToneSynth::default(), sink)
    }

    /// Create a player with an explicit synthesizer
    pub fn with_synth(library: CueLibrary, synth: ToneSynth, sink: S) -> Self {
        CuePlayer {
            library,
            synth,
            sink,
        }
    }

    /// Cue table in use
    pub fn library(&self) -> &CueLibrary {
        &self.library
    }

    /// Underlying audio sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Release the audio sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Play the cue for `event`, blocking for its duration.
    ///
    /// Never fails: load or playback errors fall back to tones, and tone
    /// errors are reported as [`PlayOutcome::Failed`].
    pub fn play(&mut self, event: &GameEvent) -> PlayOutcome {
        self.play_announced(event, &mut || {})
    }

    /// Like [`play`](Self::play), calling `on_fallback` once right before
    /// the fallback tones start
    pub fn play_announced(&mut self, event: &GameEvent, on_fallback: &mut dyn FnMut()) -> PlayOutcome {
        let Some(cue) = self.library.resolve(event) else {
            tracing::debug!(?event, "no cue mapped");
            return PlayOutcome::NoCue;
        };

        let fallback = match cue {
            CueSpec::SoundAsset { path, fallback } => match self.play_asset(&path) {
                Some(outcome) => return outcome,
                None => fallback,
            },
            CueSpec::ToneSequence(seq) => seq,
        };

        on_fallback();
        self.play_tones(&fallback)
    }

    /// Try the recorded asset; `None` means use the fallback tones
    fn play_asset(&mut self, path: &Path) -> Option<PlayOutcome> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "sound asset not present, using tones");
            return None;
        }

        let sound = match self.sink.load_sound(path) {
            Ok(sound) => sound,
            Err(e) => {
                tracing::warn!(error = %e, "error loading sound file, using tones");
                return None;
            }
        };

        match self.sink.play_sound(&sound) {
            Ok(duration) => Some(PlayOutcome::Asset {
                path: path.to_path_buf(),
                duration,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "error playing sound file, using tones");
                None
            }
        }
    }

    fn play_tones(&mut self, sequence: &ToneSequence) -> PlayOutcome {
        for tone in sequence.tones() {
            let buffer = self.synth.synthesize(tone.frequency_hz, tone.duration_ms);
            if let Err(e) = self.sink.play_tone(tone, &buffer) {
                tracing::warn!(error = %e, frequency = tone.frequency_hz, "tone playback failed");
                return PlayOutcome::Failed(e.to_string());
            }
            if tone.gap_ms > 0 {
                self.sink.pause(Duration::from_millis(tone.gap_ms as u64));
            }
        }
        PlayOutcome::Tones {
            count: sequence.len(),
        }
    }
}
