//! Serial port selection
//!
//! Auto-detection matches port descriptions against USB-serial bridge
//! keywords. When nothing matches, a [`PortChooser`] supplied by the
//! caller makes the decision (a console prompt in the binary).

use crate::{Result, TossCueError};
use std::fmt;

/// Description keywords of common ESP32 USB-serial bridges
pub const DEFAULT_KEYWORDS: [&str; 5] = ["CP210", "CH340", "USB", "UART", "Serial"];

/// An enumerated serial device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Identifier used to open the port (e.g. `/dev/ttyUSB0`, `COM3`)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

impl PortInfo {
    /// Create a port entry
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        PortInfo {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// Manual port selection capability
pub trait PortChooser {
    /// Pick one of `candidates`, or `None` to give up
    fn choose(&mut self, candidates: &[PortInfo]) -> Option<String>;
}

/// Case-insensitive substring match of any keyword in `description`
pub fn matches_any_keyword<S: AsRef<str>>(description: &str, keywords: &[S]) -> bool {
    let description = description.to_lowercase();
    keywords
        .iter()
        .any(|keyword| description.contains(&keyword.as_ref().to_lowercase()))
}

/// First port whose description matches a keyword
pub fn auto_detect<'a, S: AsRef<str>>(ports: &'a [PortInfo], keywords: &[S]) -> Option<&'a PortInfo> {
    ports
        .iter()
        .find(|port| matches_any_keyword(&port.description, keywords))
}

/// Parse a manual selection: a zero-based index into `count` entries
pub fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let index: usize = input.trim().parse().ok()?;
    (index < count).then_some(index)
}

/// Choose the port to open.
///
/// Auto-detection runs first; the chooser is only consulted when no
/// description matches.
pub fn select_port<S: AsRef<str>>(
    ports: &[PortInfo],
    keywords: &[S],
    chooser: &mut dyn PortChooser,
) -> Result<String> {
    if ports.is_empty() {
        return Err(TossCueError::TransportUnavailable(
            "no serial ports found".into(),
        ));
    }

    if let Some(port) = auto_detect(ports, keywords) {
        tracing::info!(port = %port.name, "auto-detected controller port");
        return Ok(port.name.clone());
    }

    tracing::info!("could not auto-detect controller, manual selection required");
    chooser
        .choose(ports)
        .ok_or_else(|| TossCueError::TransportUnavailable("no port selected".into()))
}
