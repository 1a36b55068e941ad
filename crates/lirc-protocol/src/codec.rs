//! Line assembly for the lircd socket byte stream.
//!
//! The lircd protocol is plain newline-terminated text. Reads from the
//! socket arrive in arbitrary chunks, so incoming bytes are accumulated
//! here until a complete line is available. Splitting a completed line off
//! never discards or duplicates buffered bytes: whatever follows the first
//! terminator stays queued for the next call.

use bytes::BytesMut;

/// The protocol line terminator.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Size of a single read chunk used by connections feeding this buffer.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Accumulates raw socket bytes and yields complete protocol lines.
///
/// This is the I/O-free half of line reading: a connection appends
/// whatever bytes the socket produced and asks for the next complete line.
/// Decoding is lenient; code strings are ASCII by contract, and any stray
/// non-ASCII bytes are dropped rather than failing the line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl LineBuffer {
    /// Create a new, empty line buffer.
    pub fn new() -> Self {
        LineBuffer {
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Append received bytes to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// True if a complete line is already buffered. Performs no I/O.
    pub fn has_line(&self) -> bool {
        self.buffer.contains(&LINE_TERMINATOR)
    }

    /// Try to take the next complete line off the buffer.
    ///
    /// Returns `Some(line)` with the terminator stripped, or `None` if no
    /// complete line has been assembled yet. Empty lines are returned as
    /// empty strings; the reply parser is responsible for ignoring them.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buffer.iter().position(|&b| b == LINE_TERMINATOR)?;

        let line_data = self.buffer.split_to(end);
        let _ = self.buffer.split_to(1); // consume the terminator

        Some(decode_lenient(&line_data))
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Decode a line as ASCII, dropping any byte outside the ASCII range.
fn decode_lenient(data: &[u8]) -> String {
    if data.is_ascii() {
        // Safe: pure ASCII is valid UTF-8.
        return String::from_utf8_lossy(data).into_owned();
    }
    log::trace!("dropping {} non-ASCII bytes from line", data.iter().filter(|b| !b.is_ascii()).count());
    data.iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect()
}
