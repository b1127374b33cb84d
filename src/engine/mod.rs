//! Event Loop
//!
//! Single-threaded orchestrator: read a line, classify it, play the cue,
//! update the tally, report. Cue playback blocks the loop, so a new line
//! is never acted on while the previous cue is still sounding.

pub mod cancel;
pub mod report;

pub use cancel::CancelToken;
pub use report::{CollectingReporter, Report, Reporter};

use crate::playback::{AudioSink, CuePlayer, PlayOutcome};
use crate::protocol::{classify, GameEvent, ProtocolMode};
use crate::score::{ScoreAggregator, ScoreState};
use crate::transport::{LineSource, ReadOutcome};
use crate::TossCueError;
use std::time::Duration;

/// Why the loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// External interrupt
    Cancelled,
    /// The transport reported end of stream
    EndOfStream,
    /// Unrecoverable transport read error
    TransportError(String),
}

/// Loop lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Reading and dispatching lines
    Listening,
    /// Stopped; no further lines are read
    Terminated(TerminationReason),
}

/// Result of a single loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No line was available
    Idle,
    /// An empty line was read and skipped
    Skipped,
    /// A line was classified and dispatched
    Dispatched,
    /// The loop has terminated
    Terminated,
}

/// Final state reported when the loop ends
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Protocol that was active
    pub mode: ProtocolMode,
    /// Final tally (scoring protocol only)
    pub score: Option<ScoreState>,
    /// Why the session ended
    pub reason: TerminationReason,
}

impl SessionSummary {
    /// Whether the session ended without a fatal error
    pub fn is_clean(&self) -> bool {
        !matches!(self.reason, TerminationReason::TransportError(_))
    }
}

/// Reads, classifies and dispatches game events
pub struct EventLoop<S: AudioSink> {
    mode: ProtocolMode,
    player: CuePlayer<S>,
    aggregator: Option<ScoreAggregator>,
    cancel: CancelToken,
    state: LoopState,
    idle_backoff: Duration,
}

impl<S: AudioSink> EventLoop<S> {
    /// Create a loop in the `Listening` state
    pub fn new(player: CuePlayer<S>, cancel: CancelToken) -> Self {
        let mode = player.library().mode();
        let aggregator = match mode {
            ProtocolMode::Scoring => Some(ScoreAggregator::new()),
            ProtocolMode::Outcome => None,
        };
        EventLoop {
            mode,
            player,
            aggregator,
            cancel,
            state: LoopState::Listening,
            idle_backoff: Duration::ZERO,
        }
    }

    /// Sleep this long after a read that produced no line
    pub fn with_idle_backoff(mut self, backoff: Duration) -> Self {
        self.idle_backoff = backoff;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Current tally, if scoring
    pub fn score(&self) -> Option<ScoreState> {
        self.aggregator.as_ref().map(ScoreAggregator::state)
    }

    /// Release the cue player (and with it the audio device)
    pub fn into_player(self) -> CuePlayer<S> {
        self.player
    }

    /// Run until cancelled, end of stream, or a fatal read error.
    ///
    /// The summary is reported to `reporter` before returning.
    pub fn run(&mut self, source: &mut dyn LineSource, reporter: &mut dyn Reporter) -> SessionSummary {
        tracing::info!(mode = %self.mode, "listening for game events");
        loop {
            match self.step(source, reporter) {
                Step::Terminated => break,
                Step::Idle if !self.idle_backoff.is_zero() => std::thread::sleep(self.idle_backoff),
                _ => {}
            }
        }

        let summary = self.summary();
        tracing::info!(reason = ?summary.reason, "listener stopped");
        reporter.finished(&summary);
        summary
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionSummary {
        let reason = match &self.state {
            LoopState::Terminated(reason) => reason.clone(),
            LoopState::Listening => TerminationReason::Cancelled,
        };
        SessionSummary {
            mode: self.mode,
            score: self.score(),
            reason,
        }
    }

    /// Perform one iteration: at most one line is read and dispatched
    pub fn step(&mut self, source: &mut dyn LineSource, reporter: &mut dyn Reporter) -> Step {
        if self.state != LoopState::Listening {
            return Step::Terminated;
        }
        if self.cancel.is_cancelled() {
            self.state = LoopState::Terminated(TerminationReason::Cancelled);
            return Step::Terminated;
        }

        let line = match source.read_line() {
            Ok(ReadOutcome::Line(line)) => line,
            Ok(ReadOutcome::Timeout) => return Step::Idle,
            Ok(ReadOutcome::Eof) => {
                self.state = LoopState::Terminated(TerminationReason::EndOfStream);
                return Step::Terminated;
            }
            Err(e) => {
                tracing::error!(error = %e, "transport read failed");
                self.state = LoopState::Terminated(TerminationReason::TransportError(e.to_string()));
                return Step::Terminated;
            }
        };

        let Some(event) = classify(&line, self.mode) else {
            return Step::Skipped;
        };
        tracing::debug!(?event, "classified line");
        self.dispatch(event, reporter);
        Step::Dispatched
    }

    fn announced_play(
        &mut self,
        event: &GameEvent,
        label: Option<&'static str>,
        reporter: &mut dyn Reporter,
    ) -> PlayOutcome {
        self.player.play_announced(event, &mut || {
            if let Some(label) = label {
                reporter.report(&Report::Fallback { label });
            }
        })
    }

    fn dispatch(&mut self, event: GameEvent, reporter: &mut dyn Reporter) {
        match event {
            GameEvent::Debug(text) => reporter.report(&Report::Debug(text)),
            GameEvent::Malformed { raw, reason } => {
                let err = TossCueError::MalformedEvent {
                    raw: raw.clone(),
                    reason: reason.clone(),
                };
                tracing::warn!(error = %err, "skipping malformed event");
                reporter.report(&Report::Malformed { raw, reason });
            }
            GameEvent::Score { points } => {
                reporter.report(&Report::Scoring { points });
                let label = self.player.library().label(&event);
                let cue = self.announced_play(&event, label, reporter);
                let state = self
                    .aggregator
                    .as_mut()
                    .map(|agg| agg.record(points))
                    .unwrap_or_default();
                reporter.report(&Report::Scored {
                    points,
                    cue,
                    label,
                    state,
                });
            }
            GameEvent::Outcome(outcome) => {
                reporter.report(&Report::Hit { outcome });
                let label = self.player.library().label(&event);
                let cue = self.announced_play(&event, label, reporter);
                reporter.report(&Report::Outcome {
                    outcome,
                    cue,
                    label,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::CueLibrary;
    use crate::playback::RecordingSink;
    use crate::Result;
    use std::collections::VecDeque;

    struct Script(VecDeque<ReadOutcome>);

    impl LineSource for Script {
        fn read_line(&mut self) -> Result<ReadOutcome> {
            Ok(self.0.pop_front().unwrap_or(ReadOutcome::Eof))
        }
    }

    /// Delivers its lines, then fails like an unplugged device
    struct Unplugged(VecDeque<ReadOutcome>);

    impl LineSource for Unplugged {
        fn read_line(&mut self) -> Result<ReadOutcome> {
            match self.0.pop_front() {
                Some(outcome) => Ok(outcome),
                None => Err(TossCueError::TransportRead(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "gone",
                ))),
            }
        }
    }

    fn scoring_loop() -> (EventLoop<RecordingSink>, RecordingSink) {
        let sink = RecordingSink::new();
        let library = CueLibrary::tones_only(ProtocolMode::Scoring);
        let event_loop = EventLoop::new(CuePlayer::new(library, sink.clone()), CancelToken::new());
        (event_loop, sink)
    }

    #[test]
    fn test_timeout_is_idle_and_changes_nothing() {
        let (mut event_loop, sink) = scoring_loop();
        let mut source = Script(VecDeque::from(vec![ReadOutcome::Timeout, ReadOutcome::Timeout]));
        let mut reporter = CollectingReporter::default();

        assert_eq!(event_loop.step(&mut source, &mut reporter), Step::Idle);
        assert_eq!(event_loop.step(&mut source, &mut reporter), Step::Idle);

        assert_eq!(event_loop.state(), &LoopState::Listening);
        assert_eq!(event_loop.score(), Some(ScoreState::new()));
        assert!(reporter.reports.is_empty());
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_empty_line_skipped() {
        let (mut event_loop, _sink) = scoring_loop();
        let mut source = Script(VecDeque::from(vec![ReadOutcome::Line(String::new())]));
        let mut reporter = CollectingReporter::default();

        assert_eq!(event_loop.step(&mut source, &mut reporter), Step::Skipped);
        assert!(reporter.reports.is_empty());
    }

    #[test]
    fn test_cancel_before_read() {
        let (mut event_loop, _sink) = scoring_loop();
        let token = event_loop.cancel.clone();
        token.cancel();
        let mut source = Script(VecDeque::from(vec![ReadOutcome::Line("POINTS:25".into())]));
        let mut reporter = CollectingReporter::default();

        let summary = event_loop.run(&mut source, &mut reporter);

        assert_eq!(summary.reason, TerminationReason::Cancelled);
        assert_eq!(summary.score, Some(ScoreState::new()));
        assert_eq!(source.0.len(), 1, "line must not be consumed after cancel");
        assert_eq!(reporter.summary, Some(summary));
    }

    #[test]
    fn test_read_error_terminates_unclean() {
        let (mut event_loop, _sink) = scoring_loop();
        let mut source = Unplugged(VecDeque::from(vec![ReadOutcome::Line("POINTS:50".into())]));
        let mut reporter = CollectingReporter::default();

        let summary = event_loop.run(&mut source, &mut reporter);

        assert!(matches!(summary.reason, TerminationReason::TransportError(_)));
        assert!(!summary.is_clean());
        assert!(matches!(
            event_loop.state(),
            LoopState::Terminated(TerminationReason::TransportError(_))
        ));
        assert_eq!(
            summary.score,
            Some(ScoreState {
                total_score: 50,
                throw_count: 1
            })
        );
        assert_eq!(reporter.summary, Some(summary));
        assert_eq!(event_loop.step(&mut source, &mut reporter), Step::Terminated);
    }

    #[test]
    fn test_terminated_loop_stays_terminated() {
        let (mut event_loop, _sink) = scoring_loop();
        let mut source = Script(VecDeque::new());
        let mut reporter = CollectingReporter::default();

        assert_eq!(event_loop.step(&mut source, &mut reporter), Step::Terminated);
        assert_eq!(
            event_loop.state(),
            &LoopState::Terminated(TerminationReason::EndOfStream)
        );
        assert_eq!(event_loop.step(&mut source, &mut reporter), Step::Terminated);
    }

    #[test]
    fn test_outcome_mode_has_no_tally() {
        let library = CueLibrary::tones_only(ProtocolMode::Outcome);
        let event_loop = EventLoop::new(CuePlayer::new(library, RecordingSink::new()), CancelToken::new());
        assert_eq!(event_loop.score(), None);
    }
}
