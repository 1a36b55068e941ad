//! Translated keypress streaming.
//!
//! A second-stage decoder maps raw code strings to application-level
//! strings, keyed by a program identifier (the lircrc mechanism).
//! The decoder itself is external; [`CodeDecoder`] is the seam, and
//! [`TranslatedConnection`] is the streaming client on top of it: pull raw
//! lines, buffer whatever the decoder returns, hand out one string per
//! call.

use std::collections::VecDeque;
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use crate::connection::RawConnection;
use crate::error::ClientResult;

/// Second-stage decoder from raw code strings to application strings.
///
/// One code string may translate to zero, one or several output strings
/// (a code bound to a sequence, or to nothing at all for this program).
pub trait CodeDecoder {
    /// Translate one code string for the given program identifier.
    fn decode(&mut self, program: &str, code: &str) -> ClientResult<Vec<String>>;
}

/// Connection yielding decoded application strings instead of raw codes.
#[derive(Debug)]
pub struct TranslatedConnection<D> {
    conn: RawConnection,
    decoder: D,
    program: String,
    pending: VecDeque<String>,
}

impl<D: CodeDecoder> TranslatedConnection<D> {
    /// Wrap a raw connection with a decoder for `program`.
    pub fn new(conn: RawConnection, decoder: D, program: impl Into<String>) -> Self {
        TranslatedConnection {
            conn,
            decoder,
            program: program.into(),
            pending: VecDeque::new(),
        }
    }

    /// Read the next decoded string; timeout semantics as
    /// [`RawConnection::read_line`].
    ///
    /// Codes that decode to nothing are skipped; codes that decode to
    /// several strings are handed out one per call, in order.
    pub fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>> {
        while self.pending.is_empty() {
            let code = match self.conn.read_line(timeout)? {
                Some(code) => code,
                None => return Ok(None),
            };
            let strings = self.decoder.decode(&self.program, &code)?;
            self.pending.extend(strings);
        }
        Ok(self.pending.pop_front())
    }

    /// True iff at least one decoded string is already buffered.
    pub fn has_data(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Access the underlying raw connection.
    pub fn raw(&self) -> &RawConnection {
        &self.conn
    }

    /// Close the connection, releasing the socket.
    pub fn close(self) {
        drop(self);
    }
}

impl<D> AsRawFd for TranslatedConnection<D> {
    fn as_raw_fd(&self) -> RawFd {
        self.conn.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    /// Decoder mapping each code to a fixed list of strings.
    struct TableDecoder;

    impl CodeDecoder for TableDecoder {
        fn decode(&mut self, _program: &str, code: &str) -> ClientResult<Vec<String>> {
            Ok(match code {
                "KEY_UP" => vec!["up".to_string()],
                "KEY_MACRO" => vec!["one".to_string(), "two".to_string()],
                _ => Vec::new(),
            })
        }
    }

    fn translated(daemon_lines: &[u8]) -> (TranslatedConnection<TableDecoder>, UnixStream) {
        let (client, mut daemon) = UnixStream::pair().expect("socketpair");
        daemon.write_all(daemon_lines).unwrap();
        let conn =
            TranslatedConnection::new(RawConnection::from_stream(client), TableDecoder, "remotetest");
        (conn, daemon)
    }

    #[test]
    fn test_single_translation() {
        let (mut conn, _daemon) = translated(b"KEY_UP\n");
        assert_eq!(
            conn.read_line(Some(Duration::from_secs(1))).unwrap().as_deref(),
            Some("up")
        );
        assert!(!conn.has_data());
    }

    #[test]
    fn test_multi_string_translation_buffered() {
        let (mut conn, _daemon) = translated(b"KEY_MACRO\n");
        assert_eq!(
            conn.read_line(Some(Duration::from_secs(1))).unwrap().as_deref(),
            Some("one")
        );
        assert!(conn.has_data());
        assert_eq!(
            conn.read_line(Some(Duration::ZERO)).unwrap().as_deref(),
            Some("two")
        );
        assert!(!conn.has_data());
    }

    #[test]
    fn test_untranslated_codes_skipped() {
        let (mut conn, _daemon) = translated(b"KEY_NOISE\nKEY_UP\n");
        assert_eq!(
            conn.read_line(Some(Duration::from_secs(1))).unwrap().as_deref(),
            Some("up")
        );
    }

    #[test]
    fn test_timeout_passes_through() {
        let (mut conn, _daemon) = translated(b"");
        assert_eq!(conn.read_line(Some(Duration::ZERO)).unwrap(), None);
    }
}
