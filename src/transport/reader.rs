//! Newline framing over a byte stream

use super::{LineSource, ReadOutcome};
use crate::protocol::decode_line;
use crate::{Result, TossCueError};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 256;
/// Longest line kept; anything longer is delivered in pieces of this size
pub const MAX_LINE_LEN: usize = 4096;

/// Splits a byte stream into lines.
///
/// Bytes are buffered until a `\n` arrives, so a line split across
/// several reads is delivered whole. Timeouts from the underlying reader
/// surface as [`ReadOutcome::Timeout`] without losing buffered bytes.
/// A run of [`MAX_LINE_LEN`] bytes without a newline is flushed as a line.
pub struct LineReader<R> {
    inner: R,
    pending: Vec<u8>,
    // Bytes of `pending` already searched for `\n`
    scanned: usize,
    eof: bool,
}

impl<R: Read> LineReader<R> {
    /// Wrap a byte reader
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            pending: Vec::new(),
            scanned: 0,
            eof: false,
        }
    }

    /// Underlying reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    fn take_line(&mut self) -> Option<String> {
        let end = match self.pending[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(offset) => self.scanned + offset + 1,
            None if self.pending.len() >= MAX_LINE_LEN => {
                tracing::warn!(limit = MAX_LINE_LEN, "no line terminator, flushing buffered bytes");
                MAX_LINE_LEN
            }
            None => {
                self.scanned = self.pending.len();
                return None;
            }
        };
        let line: Vec<u8> = self.pending.drain(..end).collect();
        self.scanned = 0;
        Some(decode_line(&line))
    }
}

impl<R: Read> LineSource for LineReader<R> {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        loop {
            if let Some(line) = self.take_line() {
                return Ok(ReadOutcome::Line(line));
            }

            if self.eof {
                if self.pending.is_empty() {
                    return Ok(ReadOutcome::Eof);
                }
                // Unterminated final line
                let rest = std::mem::take(&mut self.pending);
                self.scanned = 0;
                return Ok(ReadOutcome::Line(decode_line(&rest)));
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.inner.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) => match e.kind() {
                    ErrorKind::TimedOut | ErrorKind::WouldBlock => return Ok(ReadOutcome::Timeout),
                    ErrorKind::Interrupted => continue,
                    _ => return Err(TossCueError::TransportRead(e)),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    /// Reader that replays scripted chunks and errors
    struct Scripted(VecDeque<io::Result<Vec<u8>>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
            }
        }
    }

    fn timeout() -> io::Result<Vec<u8>> {
        Err(io::Error::new(ErrorKind::TimedOut, "timed out"))
    }

    #[test]
    fn test_splits_lines() {
        let mut reader = LineReader::new(&b"hello\r\nPOINTS:50\n"[..]);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("hello".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("POINTS:50".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_line_split_across_timeouts() {
        let mut reader = LineReader::new(Scripted(VecDeque::from(vec![
            Ok(b"POIN".to_vec()),
            timeout(),
            Ok(b"TS:75\nGO".to_vec()),
        ])));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Timeout);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("POINTS:75".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("GO".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_empty_lines_preserved_for_classifier() {
        let mut reader = LineReader::new(&b"\n\nx\n"[..]);
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line(String::new()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line(String::new()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("x".into()));
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut reader = LineReader::new(&b"\xc3(BAD\n"[..]);
        assert_eq!(
            reader.read_line().unwrap(),
            ReadOutcome::Line("\u{FFFD}(BAD".into())
        );
    }

    /// Reader that never sends a newline
    struct Unterminated {
        remaining: usize,
    }

    impl Read for Unterminated {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.remaining);
            buf[..n].fill(b'x');
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_unterminated_stream_is_bounded() {
        let mut reader = LineReader::new(Unterminated {
            remaining: 8 * 1024 * 1024,
        });

        match reader.read_line().unwrap() {
            ReadOutcome::Line(line) => {
                assert_eq!(line.len(), MAX_LINE_LEN);
                assert!(line.bytes().all(|b| b == b'x'));
            }
            other => panic!("expected a flushed line, got {other:?}"),
        }
        assert!(reader.pending.len() < MAX_LINE_LEN);
        assert_eq!(reader.get_ref().remaining, 8 * 1024 * 1024 - MAX_LINE_LEN);
    }

    #[test]
    fn test_line_after_long_partial_read() {
        let mut stream = vec![b'a'; 1000];
        stream.extend_from_slice(b"\nPOINTS:25\n");
        let mut reader = LineReader::new(Scripted(
            stream.chunks(READ_CHUNK).map(|c| Ok(c.to_vec())).collect(),
        ));

        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("a".repeat(1000)));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Line("POINTS:25".into()));
        assert_eq!(reader.read_line().unwrap(), ReadOutcome::Eof);
    }

    #[test]
    fn test_hard_error_is_fatal() {
        let mut reader = LineReader::new(Scripted(VecDeque::from(vec![Err(io::Error::new(
            ErrorKind::BrokenPipe,
            "device unplugged",
        ))])));
        let err = reader.read_line().unwrap_err();
        assert!(err.is_fatal());
    }
}
