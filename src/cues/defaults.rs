//! Built-in cue table
//!
//! Tone tuples are `(frequency_hz, duration_ms, gap_ms)`; the gap is the
//! silence after that tone. The final tone of a sequence has no gap.

use super::CueKey;
use crate::protocol::{Outcome, ProtocolMode};

/// Gap between consecutive tones of a fallback sequence
pub const INTER_TONE_GAP_MS: u32 = 50;

const G: u32 = INTER_TONE_GAP_MS;

/// One row of the cue table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueEntry {
    /// Event the row answers
    pub key: CueKey,
    /// Sound asset file name, relative to the asset directory
    pub asset: &'static str,
    /// Fallback tones
    pub tones: &'static [(u32, u32, u32)],
    /// Console feedback shown when the fallback plays
    pub label: &'static str,
}

const SCORING: [CueEntry; 4] = [
    CueEntry {
        key: CueKey::Points(100),
        asset: "100.wav",
        tones: &[(600, 100, G), (700, 100, G), (800, 100, G), (1000, 400, 0)],
        label: "100 POINTS! JACKPOT!",
    },
    CueEntry {
        key: CueKey::Points(75),
        asset: "75.wav",
        tones: &[(600, 150, G), (750, 150, G), (900, 300, 0)],
        label: "75 POINTS! Great throw!",
    },
    CueEntry {
        key: CueKey::Points(50),
        asset: "50.wav",
        tones: &[(500, 150, G), (700, 250, 0)],
        label: "50 POINTS! Good job!",
    },
    CueEntry {
        key: CueKey::Points(25),
        asset: "25.wav",
        tones: &[(500, 300, 0)],
        label: "25 POINTS! Nice!",
    },
];

const OUTCOME: [CueEntry; 2] = [
    CueEntry {
        key: CueKey::Outcome(Outcome::Good),
        asset: "good.wav",
        tones: &[(600, 150, G), (700, 150, G), (900, 300, 0)],
        label: "GOOD HIT! Great hit!",
    },
    CueEntry {
        key: CueKey::Outcome(Outcome::Bad),
        asset: "bad.wav",
        tones: &[(300, 300, G), (200, 500, 0)],
        label: "BAD HIT! Miss!",
    },
];

/// Built-in table for a protocol mode
pub fn default_entries(mode: ProtocolMode) -> Vec<CueEntry> {
    match mode {
        ProtocolMode::Scoring => SCORING.to_vec(),
        ProtocolMode::Outcome => OUTCOME.to_vec(),
    }
}
