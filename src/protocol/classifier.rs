//! Line Classifier

use super::{GameEvent, Outcome, ProtocolMode};

/// Prefix that marks a scoring event line
pub const POINTS_PREFIX: &str = "POINTS:";
/// Outcome token for a hit
pub const TOKEN_GOOD: &str = "GOOD";
/// Outcome token for a miss
pub const TOKEN_BAD: &str = "BAD";

/// Decode raw transport bytes into a line.
///
/// Invalid UTF-8 sequences become U+FFFD instead of failing, and the
/// trailing line terminator (`\n`, `\r\n` or a stray `\r`) is removed.
/// No other whitespace is touched.
pub fn decode_line(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches(['\r', '\n']).to_string()
}

/// Classify one terminator-stripped line.
///
/// Returns `None` for an empty line, which is skipped entirely.
pub fn classify(line: &str, mode: ProtocolMode) -> Option<GameEvent> {
    if line.is_empty() {
        return None;
    }

    let event = match mode {
        ProtocolMode::Scoring => classify_scoring(line),
        ProtocolMode::Outcome => classify_outcome(line),
    };
    Some(event)
}

fn classify_scoring(line: &str) -> GameEvent {
    let Some(payload) = line.strip_prefix(POINTS_PREFIX) else {
        return GameEvent::Debug(line.to_string());
    };

    // Points are non-negative; "-25" is malformed
    match payload.parse::<u64>() {
        Ok(points) => GameEvent::Score { points },
        Err(e) => GameEvent::Malformed {
            raw: line.to_string(),
            reason: if payload.is_empty() {
                "missing points value".to_string()
            } else {
                format!("invalid points value '{}': {}", payload, e)
            },
        },
    }
}

fn classify_outcome(line: &str) -> GameEvent {
    match line {
        TOKEN_GOOD => GameEvent::Outcome(Outcome::Good),
        TOKEN_BAD => GameEvent::Outcome(Outcome::Bad),
        _ => GameEvent::Debug(line.to_string()),
    }
}
