//! Incremental line framing over a streamed response body.
//!
//! The proxy flushes its response as it goes, so chunks arrive at arbitrary
//! byte boundaries that need not align with line breaks. [`LineBuffer`]
//! buffers partial lines across chunks and yields each completed line as it
//! becomes available, which keeps the consumer live rather than waiting for
//! the full body.

use bytes::BytesMut;
use memchr::memchr;

/// Incremental splitter that assembles newline-terminated lines from raw
/// byte chunks.
///
/// Lines are yielded without their terminator; a trailing `\r` is stripped so
/// `\r\n` framing is tolerated. Empty lines are surfaced (SSE uses them as
/// frame separators) and left to the caller to skip. Bytes are decoded
/// lossily, so a malformed UTF-8 line is still echoed rather than dropped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: BytesMut,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Append one raw chunk from the wire.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pop the next completed line, if one has been fully buffered.
    pub fn next_line(&mut self) -> Option<String> {
        let newline = memchr(b'\n', &self.buffer)?;
        let line = self.buffer.split_to(newline + 1);
        Some(decode_line(&line[..newline]))
    }

    /// Drain a trailing unterminated line after the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split_to(self.buffer.len());
        Some(decode_line(&rest))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
