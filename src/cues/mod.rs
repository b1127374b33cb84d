//! Cue Library
//!
//! Maps game events to audio cues. Every mapped event has a recorded
//! sound asset name and a synthesized fallback sequence; the player
//! decides at play time which of the two actually sounds.

pub mod defaults;

pub use defaults::{default_entries, CueEntry};

use crate::protocol::{GameEvent, Outcome, ProtocolMode};
use std::path::{Path, PathBuf};

/// One synthesized tone followed by a silent gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    /// Tone frequency in Hz
    pub frequency_hz: u32,
    /// Tone length in milliseconds
    pub duration_ms: u32,
    /// Silence after the tone in milliseconds
    pub gap_ms: u32,
}

impl Tone {
    /// Create a tone with a trailing gap
    pub const fn new(frequency_hz: u32, duration_ms: u32, gap_ms: u32) -> Self {
        Tone {
            frequency_hz,
            duration_ms,
            gap_ms,
        }
    }
}

/// Ordered tones played back to back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToneSequence {
    tones: Vec<Tone>,
}

impl ToneSequence {
    /// Build a sequence from tones in playback order
    pub fn new(tones: Vec<Tone>) -> Self {
        ToneSequence { tones }
    }

    /// Tones in playback order
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Number of tones
    pub fn len(&self) -> usize {
        self.tones.len()
    }

    /// Whether the sequence has no tones
    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Total time the sequence occupies, tones plus gaps
    pub fn total_duration_ms(&self) -> u32 {
        self.tones.iter().map(|t| t.duration_ms + t.gap_ms).sum()
    }
}

impl From<&[(u32, u32, u32)]> for ToneSequence {
    fn from(tones: &[(u32, u32, u32)]) -> Self {
        ToneSequence::new(
            tones
                .iter()
                .map(|&(freq, dur, gap)| Tone::new(freq, dur, gap))
                .collect(),
        )
    }
}

/// Audio to play for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueSpec {
    /// Recorded sound, with the tones to use if it cannot be played
    SoundAsset {
        /// Asset location
        path: PathBuf,
        /// Fallback when the asset is missing or broken
        fallback: ToneSequence,
    },
    /// Synthesized tones only
    ToneSequence(ToneSequence),
}

impl CueSpec {
    /// The synthesized sequence for this cue
    pub fn tones(&self) -> &ToneSequence {
        match self {
            CueSpec::SoundAsset { fallback, .. } => fallback,
            CueSpec::ToneSequence(seq) => seq,
        }
    }
}

/// Logical key of a mapped cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKey {
    /// Scoring protocol point value
    Points(u64),
    /// Outcome protocol result
    Outcome(Outcome),
}

impl CueKey {
    /// Key for an event, if the event can carry a cue at all
    pub fn for_event(event: &GameEvent) -> Option<CueKey> {
        match event {
            GameEvent::Score { points } => Some(CueKey::Points(*points)),
            GameEvent::Outcome(outcome) => Some(CueKey::Outcome(*outcome)),
            GameEvent::Debug(_) | GameEvent::Malformed { .. } => None,
        }
    }
}

/// Read-only event to cue table, built once at startup
#[derive(Debug, Clone)]
pub struct CueLibrary {
    mode: ProtocolMode,
    asset_dir: Option<PathBuf>,
    entries: Vec<CueEntry>,
}

impl CueLibrary {
    /// Default table for `mode`, with sound assets looked up in `asset_dir`
    pub fn with_defaults(mode: ProtocolMode, asset_dir: impl AsRef<Path>) -> Self {
        CueLibrary {
            mode,
            asset_dir: Some(asset_dir.as_ref().to_path_buf()),
            entries: default_entries(mode),
        }
    }

    /// Default table for `mode` that never references sound assets
    pub fn tones_only(mode: ProtocolMode) -> Self {
        CueLibrary {
            mode,
            asset_dir: None,
            entries: default_entries(mode),
        }
    }

    /// Protocol mode this table serves
    pub fn mode(&self) -> ProtocolMode {
        self.mode
    }

    /// All entries in the table
    pub fn entries(&self) -> &[CueEntry] {
        &self.entries
    }

    /// Resolve an event to its cue.
    ///
    /// `None` is the defined "no cue" result: debug and malformed lines,
    /// and point values without an entry (e.g. 33), produce no audio.
    pub fn resolve(&self, event: &GameEvent) -> Option<CueSpec> {
        let entry = self.entry(event)?;
        let fallback = ToneSequence::from(entry.tones);
        Some(match &self.asset_dir {
            Some(dir) => CueSpec::SoundAsset {
                path: dir.join(entry.asset),
                fallback,
            },
            None => CueSpec::ToneSequence(fallback),
        })
    }

    /// Console feedback label for an event, if it is mapped
    pub fn label(&self, event: &GameEvent) -> Option<&'static str> {
        self.entry(event).map(|entry| entry.label)
    }

    fn entry(&self, event: &GameEvent) -> Option<&CueEntry> {
        let key = CueKey::for_event(event)?;
        self.entries.iter().find(|entry| entry.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tones: &[(u32, u32, u32)]) -> ToneSequence {
        ToneSequence::from(tones)
    }

    #[test]
    fn test_default_scoring_sequences() {
        let lib = CueLibrary::tones_only(ProtocolMode::Scoring);
        let cases: [(u64, ToneSequence); 4] = [
            (
                100,
                seq(&[(600, 100, 50), (700, 100, 50), (800, 100, 50), (1000, 400, 0)]),
            ),
            (75, seq(&[(600, 150, 50), (750, 150, 50), (900, 300, 0)])),
            (50, seq(&[(500, 150, 50), (700, 250, 0)])),
            (25, seq(&[(500, 300, 0)])),
        ];
        for (points, expected) in cases {
            assert_eq!(
                lib.resolve(&GameEvent::Score { points }),
                Some(CueSpec::ToneSequence(expected)),
                "points {points}"
            );
        }
    }

    #[test]
    fn test_default_outcome_sequences() {
        let lib = CueLibrary::tones_only(ProtocolMode::Outcome);
        assert_eq!(
            lib.resolve(&GameEvent::Outcome(Outcome::Good)),
            Some(CueSpec::ToneSequence(seq(&[
                (600, 150, 50),
                (700, 150, 50),
                (900, 300, 0)
            ])))
        );
        assert_eq!(
            lib.resolve(&GameEvent::Outcome(Outcome::Bad)),
            Some(CueSpec::ToneSequence(seq(&[(300, 300, 50), (200, 500, 0)])))
        );
    }

    #[test]
    fn test_unmapped_values_have_no_cue() {
        let lib = CueLibrary::with_defaults(ProtocolMode::Scoring, "sounds");
        assert_eq!(lib.resolve(&GameEvent::Score { points: 33 }), None);
        assert_eq!(lib.resolve(&GameEvent::Score { points: 0 }), None);
        assert_eq!(lib.resolve(&GameEvent::Debug("hello".into())), None);
        assert_eq!(lib.label(&GameEvent::Score { points: 33 }), None);
    }

    #[test]
    fn test_outcome_table_ignores_points() {
        let lib = CueLibrary::tones_only(ProtocolMode::Outcome);
        assert_eq!(lib.resolve(&GameEvent::Score { points: 50 }), None);
    }

    #[test]
    fn test_asset_paths_join_directory() {
        let lib = CueLibrary::with_defaults(ProtocolMode::Scoring, "sounds");
        match lib.resolve(&GameEvent::Score { points: 75 }) {
            Some(CueSpec::SoundAsset { path, fallback }) => {
                assert_eq!(path, Path::new("sounds").join("75.wav"));
                assert_eq!(fallback.len(), 3);
            }
            other => panic!("expected sound asset, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_duration() {
        let lib = CueLibrary::tones_only(ProtocolMode::Scoring);
        let cue = lib.resolve(&GameEvent::Score { points: 100 }).unwrap();
        assert_eq!(cue.tones().total_duration_ms(), 100 * 3 + 50 * 3 + 400);
    }
}
