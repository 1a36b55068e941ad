//! Error types for the lircd protocol.

use thiserror::Error;

/// Errors that can occur when parsing lircd protocol data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A reply line that is not valid for the parser's current state.
    /// Includes a non-integer line count after `DATA`.
    #[error("cannot parse {line:?} in state {state}")]
    BadPacket {
        /// The offending input line, as fed.
        line: String,
        /// Name of the parser state the line arrived in.
        state: &'static str,
    },

    /// The parser hit a protocol violation earlier and cannot be reused.
    #[error("parser poisoned by an earlier protocol violation")]
    Poisoned,

    /// A broadcast line that does not match the keypress format.
    #[error("cannot parse keypress line: {0}")]
    BadKeypress(String),
}

/// Result type alias for protocol operations.
pub type ProtoResult<T> = Result<T, ProtocolError>;
