//! Error types for the lircd client.

use lirc_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur when talking to the daemon.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A command got no reply line within its timeout. Terminal for that
    /// command, unlike a raw read timeout which is reported as "no line".
    #[error("no data from remote host")]
    Timeout,

    /// The daemon closed the connection.
    #[error("connection closed by remote host")]
    ConnectionClosed,

    /// The reply stream violated the protocol.
    #[error("protocol error: {source}")]
    Protocol {
        #[from]
        source: ProtocolError,
    },

    /// I/O error on the socket.
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A send command was issued with an empty key list.
    #[error("no keys given")]
    MissingKeys,
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
