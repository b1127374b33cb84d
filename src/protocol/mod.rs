//! Wire Line Protocol
//!
//! Turns one line of controller output into a typed game event. The
//! controller interleaves event lines with free-form debug text, so
//! anything that is not an event is passed through untouched.

pub mod classifier;

pub use classifier::{classify, decode_line, POINTS_PREFIX, TOKEN_BAD, TOKEN_GOOD};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which event protocol the listener speaks.
///
/// Exactly one mode is active per process.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolMode {
    /// `POINTS:<int>` lines with a running score
    #[default]
    Scoring,
    /// Bare `GOOD` / `BAD` lines
    Outcome,
}

impl ProtocolMode {
    /// Get string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolMode::Scoring => "scoring",
            ProtocolMode::Outcome => "outcome",
        }
    }
}

impl fmt::Display for ProtocolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary hit result in the outcome protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Target hit
    Good,
    /// Target missed
    Bad,
}

/// A classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A throw scored `points`
    Score {
        /// Points awarded for the throw
        points: u64,
    },
    /// A hit or miss
    Outcome(Outcome),
    /// Non-event text, forwarded verbatim
    Debug(String),
    /// Event prefix with an unparseable payload
    Malformed {
        /// The full offending line
        raw: String,
        /// Parse failure description
        reason: String,
    },
}

impl GameEvent {
    /// Whether this event should trigger a cue.
    pub fn is_game_event(&self) -> bool {
        matches!(self, GameEvent::Score { .. } | GameEvent::Outcome(_))
    }
}
