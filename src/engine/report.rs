//! Loop reporting
//!
//! The loop never prints. Everything user-facing goes through a
//! [`Reporter`], which the binary implements as console output.

use super::SessionSummary;
use crate::playback::PlayOutcome;
use crate::protocol::Outcome;
use crate::score::ScoreState;

/// Something the loop wants shown to the operator
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Controller debug text, verbatim
    Debug(String),
    /// A scoring line was recognized and is about to be played
    Scoring {
        /// Points scored
        points: u64,
    },
    /// The cue is falling back to tones; shown before they sound
    Fallback {
        /// Feedback label of the cue
        label: &'static str,
    },
    /// A scored throw was played and recorded
    Scored {
        /// Points scored
        points: u64,
        /// What the player did
        cue: PlayOutcome,
        /// Feedback label of the cue, if mapped
        label: Option<&'static str>,
        /// Tally after recording the throw
        state: ScoreState,
    },
    /// A hit/miss was recognized and is about to be played
    Hit {
        /// Hit or miss
        outcome: Outcome,
    },
    /// A hit/miss was played
    Outcome {
        /// Hit or miss
        outcome: Outcome,
        /// What the player did
        cue: PlayOutcome,
        /// Feedback label of the cue
        label: Option<&'static str>,
    },
    /// An event line could not be parsed
    Malformed {
        /// The offending line
        raw: String,
        /// Parse failure description
        reason: String,
    },
}

/// Receives loop output
pub trait Reporter {
    /// Called for every dispatched line
    fn report(&mut self, report: &Report);

    /// Called once when the loop terminates
    fn finished(&mut self, _summary: &SessionSummary) {}
}

/// Reporter that keeps everything in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    /// Reports in arrival order
    pub reports: Vec<Report>,
    /// Summary, once finished
    pub summary: Option<SessionSummary>,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }

    fn finished(&mut self, summary: &SessionSummary) {
        self.summary = Some(summary.clone());
    }
}
