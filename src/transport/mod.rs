//! Serial Transport & Discovery
//!
//! The listener only needs a source of lines. [`LineReader`] frames any
//! byte reader (a serial port, a capture file) into lines; discovery
//! helpers pick which serial device to open.

pub mod discovery;
pub mod reader;
#[cfg(feature = "serial")]
pub mod serial;

pub use discovery::{
    auto_detect, matches_any_keyword, parse_choice, select_port, PortChooser, PortInfo,
    DEFAULT_KEYWORDS,
};
pub use reader::{LineReader, MAX_LINE_LEN};
#[cfg(feature = "serial")]
pub use serial::{list_ports, SerialTransport};

use crate::Result;

/// Link speed used by the game controller
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Result of one read attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete, terminator-stripped line
    Line(String),
    /// Nothing arrived within the read timeout
    Timeout,
    /// The stream has ended
    Eof,
}

/// Capability to pull lines from a transport.
///
/// `Err` is reserved for unrecoverable I/O failures; a quiet link is
/// [`ReadOutcome::Timeout`].
pub trait LineSource {
    /// Wait (bounded by the transport timeout) for the next line
    fn read_line(&mut self) -> Result<ReadOutcome>;
}

impl<L: LineSource + ?Sized> LineSource for Box<L> {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        (**self).read_line()
    }
}
