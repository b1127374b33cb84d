//! Ball-toss game audio feedback
//!
//! Listens to a newline-delimited text stream coming from the game
//! controller (an ESP32 on a serial link), recognizes game events among
//! the controller's debug chatter, and answers each event with an audio
//! cue: a recorded sound if one is available, otherwise a synthesized
//! tone sequence.
//!
//! Two protocol variants exist and exactly one is active per process:
//! - Scoring: `POINTS:<int>` lines, with a running score tally
//! - Outcome: bare `GOOD` / `BAD` lines, no tally
//!
//! # Crate feature flags
//! - `device` (opt-in): rodio-backed audio output (`playback::RodioDevice`)
//! - `serial` (opt-in): serialport-backed transport (`transport::SerialTransport`)
//! - `cli` (opt-in): both of the above, required for the listener binary
//!
//! # Quick start
//! ```no_run
//! use tosscue::{classify, CueLibrary, CuePlayer, GameEvent, ProtocolMode, RecordingSink};
//!
//! let library = CueLibrary::with_defaults(ProtocolMode::Scoring, ".");
//! let mut player = CuePlayer::new(library, RecordingSink::new());
//! if let Some(event) = classify("POINTS:50", ProtocolMode::Scoring) {
//!     player.play(&event);
//! }
//! ```

#![warn(missing_docs)]

pub mod config; // Runtime Configuration
pub mod cues; // Cue Library
pub mod engine; // Event Loop
pub mod playback; // Cue Player & Audio Device
pub mod protocol; // Line Classifier
pub mod score; // Score Aggregator
pub mod synth; // Tone Synthesizer
pub mod transport; // Serial Transport & Discovery

use std::path::PathBuf;

/// Error types for listener operations
#[derive(thiserror::Error, Debug)]
pub enum TossCueError {
    /// No transport could be selected or the chosen one failed to open
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// I/O failure while reading from an open transport
    #[error("Transport read error: {0}")]
    TransportRead(#[source] std::io::Error),

    /// Event line whose payload could not be parsed
    #[error("Malformed event '{raw}': {reason}")]
    MalformedEvent {
        /// The offending line
        raw: String,
        /// Why parsing failed
        reason: String,
    },

    /// Sound asset missing or undecodable
    #[error("Failed to load sound asset '{}': {reason}", path.display())]
    AssetLoad {
        /// Asset location
        path: PathBuf,
        /// Why loading failed
        reason: String,
    },

    /// Asset or tone could not be played
    #[error("Audio playback error: {0}")]
    AssetPlayback(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TossCueError {
    /// Whether this error ends the listening session.
    ///
    /// Transport failures are fatal; malformed events and every audio
    /// failure are recovered where they occur.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TossCueError::TransportUnavailable(_) | TossCueError::TransportRead(_)
        )
    }
}

impl From<String> for TossCueError {
    /// Converts a String into `TossCueError::Other`.
    ///
    /// Prefer a specific variant where one fits; this exists for ad-hoc
    /// messages in setup code.
    fn from(msg: String) -> Self {
        TossCueError::Other(msg)
    }
}

impl From<&str> for TossCueError {
    /// Converts a string slice into `TossCueError::Other`.
    fn from(msg: &str) -> Self {
        TossCueError::Other(msg.to_string())
    }
}

/// Result type for listener operations
pub type Result<T> = std::result::Result<T, TossCueError>;

// Public API exports
pub use config::Config;
pub use cues::{CueLibrary, CueSpec, Tone, ToneSequence};
pub use engine::{
    CancelToken, CollectingReporter, EventLoop, LoopState, Report, Reporter, SessionSummary, Step,
    TerminationReason,
};
pub use playback::{AudioSink, CuePlayer, PlayOutcome, RecordingSink};
pub use protocol::{classify, decode_line, GameEvent, Outcome, ProtocolMode};
pub use score::{ScoreAggregator, ScoreState};
pub use synth::{ToneBuffer, ToneSynth};
pub use transport::{LineReader, LineSource, PortChooser, PortInfo, ReadOutcome};

#[cfg(feature = "device")]
pub use playback::RodioDevice;
#[cfg(feature = "serial")]
pub use transport::SerialTransport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(TossCueError::TransportUnavailable("none".into()).is_fatal());
        let read = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged");
        assert!(TossCueError::TransportRead(read).is_fatal());
        assert!(!TossCueError::AssetPlayback("busy".into()).is_fatal());
        assert!(!TossCueError::MalformedEvent {
            raw: "POINTS:x".into(),
            reason: "invalid digit".into(),
        }
        .is_fatal());
    }

    #[test]
    fn test_string_conversion() {
        let err: TossCueError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
