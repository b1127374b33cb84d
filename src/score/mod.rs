//! Score Aggregator
//!
//! Running tally for the scoring protocol. State is a plain value owned
//! by the event loop; `record` is the only way it changes.

use std::fmt;

/// Cumulative score and throw count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreState {
    /// Sum of all recorded points
    pub total_score: u64,
    /// Number of recorded throws
    pub throw_count: u64,
}

impl ScoreState {
    /// Fresh tally with no throws
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean points per throw, `0.0` when nothing has been thrown
    pub fn average(&self) -> f64 {
        if self.throw_count == 0 {
            0.0
        } else {
            self.total_score as f64 / self.throw_count as f64
        }
    }

    /// Whether any throw has been recorded
    pub fn has_throws(&self) -> bool {
        self.throw_count > 0
    }
}

impl fmt::Display for ScoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {} points | Throws: {} | Avg: {:.1}",
            self.total_score,
            self.throw_count,
            self.average()
        )
    }
}

/// Applies scored throws to a [`ScoreState`]
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    state: ScoreState,
}

impl ScoreAggregator {
    /// Start a new tally at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one throw worth `points` and return the updated snapshot.
    ///
    /// Any value is accepted, including ones with no mapped cue.
    pub fn record(&mut self, points: u64) -> ScoreState {
        self.state = Self::apply(self.state, points);
        self.state
    }

    /// Pure transition: `state` plus one throw of `points`
    pub fn apply(state: ScoreState, points: u64) -> ScoreState {
        ScoreState {
            total_score: state.total_score.saturating_add(points),
            throw_count: state.throw_count.saturating_add(1),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> ScoreState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_accumulation() {
        let mut agg = ScoreAggregator::new();
        for points in [25, 50, 100] {
            agg.record(points);
        }
        let state = agg.state();
        assert_eq!(
            state,
            ScoreState {
                total_score: 175,
                throw_count: 3
            }
        );
        assert_abs_diff_eq!(state.average(), 58.333, epsilon = 1e-3);
        assert_eq!(format!("{:.1}", state.average()), "58.3");
    }

    #[test]
    fn test_zero_throws_average() {
        let state = ScoreState::new();
        assert_eq!(state.average(), 0.0);
        assert!(!state.has_throws());
    }

    #[test]
    fn test_record_returns_snapshot() {
        let mut agg = ScoreAggregator::new();
        assert_eq!(
            agg.record(25),
            ScoreState {
                total_score: 25,
                throw_count: 1
            }
        );
        assert_eq!(
            agg.record(999),
            ScoreState {
                total_score: 1024,
                throw_count: 2
            }
        );
    }

    #[test]
    fn test_apply_is_pure() {
        let before = ScoreState {
            total_score: 10,
            throw_count: 1,
        };
        let after = ScoreAggregator::apply(before, 75);
        assert_eq!(before.total_score, 10);
        assert_eq!(after.total_score, 85);
        assert_eq!(after.throw_count, 2);
    }

    #[test]
    fn test_large_points_saturate() {
        let mut agg = ScoreAggregator::new();
        agg.record(u64::MAX - 10);
        let state = agg.record(4_294_967_296);
        assert_eq!(state.total_score, u64::MAX);
        assert_eq!(state.throw_count, 2);
    }

    #[test]
    fn test_display_line() {
        let state = ScoreState {
            total_score: 175,
            throw_count: 3,
        };
        assert_eq!(state.to_string(), "Score: 175 points | Throws: 3 | Avg: 58.3");
    }
}
