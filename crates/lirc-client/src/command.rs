//! Command execution against a daemon connection.
//!
//! A [`Command`] binds one formatted request to a connection and a fresh
//! [`ReplyParser`], then drives the exchange: send the line, read and feed
//! reply lines until the parser reports completion. One command is in
//! flight per connection at a time; the protocol has no pipelining.

use std::time::Duration;

use tracing::{debug, warn};

use lirc_protocol::{Reply, ReplyParser, Request};

use crate::connection::CommandConnection;
use crate::error::{ClientError, ClientResult};

/// One pending request/reply exchange.
///
/// [`Command::run`] covers the common case. Callers that want their own
/// timeout/retry policy can use the lower-level pieces instead: [`send`],
/// [`read_line`], [`feed`] and [`is_completed`] make the loop explicit.
///
/// [`send`]: Command::send
/// [`read_line`]: Command::read_line
/// [`feed`]: Command::feed
/// [`is_completed`]: Command::is_completed
#[derive(Debug)]
pub struct Command<'c> {
    line: Vec<u8>,
    conn: &'c mut CommandConnection,
    parser: ReplyParser,
}

impl<'c> Command<'c> {
    /// Build a pending exchange for `request`.
    ///
    /// Usage errors are rejected here, before any I/O: a
    /// [`Request::SendOnce`] with an empty key list fails with
    /// [`ClientError::MissingKeys`].
    pub fn new(request: &Request, conn: &'c mut CommandConnection) -> ClientResult<Command<'c>> {
        if let Request::SendOnce { keys, .. } = request {
            if keys.is_empty() {
                return Err(ClientError::MissingKeys);
            }
        }
        Ok(Command {
            line: request.encode(),
            conn,
            parser: ReplyParser::new(),
        })
    }

    /// Run the exchange and return the [`Reply`].
    ///
    /// `timeout` bounds each reply-line read; when it elapses the command
    /// fails with [`ClientError::Timeout`]. `None` blocks indefinitely.
    pub fn run(mut self, timeout: Option<Duration>) -> ClientResult<Reply> {
        debug!(request = %String::from_utf8_lossy(&self.line).trim_end(), "running command");
        self.send()?;
        while !self.parser.is_completed() {
            match self.conn.read_line(timeout)? {
                Some(line) => self.parser.feed(&line)?,
                None => {
                    warn!("command reply timed out");
                    return Err(ClientError::Timeout);
                }
            }
        }
        Ok(self.parser.into_reply())
    }

    /// Write the request line to the connection.
    pub fn send(&mut self) -> ClientResult<()> {
        self.conn.send(&self.line)
    }

    /// Read one reply line from the connection; semantics as
    /// [`CommandConnection::read_line`].
    pub fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>> {
        self.conn.read_line(timeout)
    }

    /// Feed one line into the reply parser.
    pub fn feed(&mut self, line: &str) -> ClientResult<()> {
        self.parser.feed(line)?;
        Ok(())
    }

    /// True once the reply is fully parsed.
    pub fn is_completed(&self) -> bool {
        self.parser.is_completed()
    }

    /// The parser driving this exchange.
    pub fn parser(&self) -> &ReplyParser {
        &self.parser
    }

    /// Mutable parser access, e.g. to record a caller-level failure.
    pub fn parser_mut(&mut self) -> &mut ReplyParser {
        &mut self.parser
    }

    /// Consume the command and take the reply in whatever state it is.
    pub fn into_reply(self) -> Reply {
        self.parser.into_reply()
    }
}

impl CommandConnection {
    /// Run one request to completion on this connection.
    ///
    /// Shorthand for [`Command::new`] followed by [`Command::run`].
    pub fn run(&mut self, request: &Request, timeout: Option<Duration>) -> ClientResult<Reply> {
        Command::new(request, self)?.run(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::RawConnection;
    use std::os::unix::net::UnixStream;

    #[test]
    fn test_empty_send_once_rejected_before_io() {
        let (client, _daemon) = UnixStream::pair().expect("socketpair");
        let mut conn = CommandConnection::from_raw(RawConnection::from_stream(client));

        let request = Request::SendOnce {
            remote: "acme".to_string(),
            keys: Vec::new(),
        };
        let err = Command::new(&request, &mut conn).unwrap_err();
        assert!(matches!(err, ClientError::MissingKeys));
    }

    #[test]
    fn test_run_times_out_without_reply() {
        let (client, _daemon) = UnixStream::pair().expect("socketpair");
        let mut conn = CommandConnection::from_raw(RawConnection::from_stream(client));

        let err = conn
            .run(&Request::Version, Some(Duration::ZERO))
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
    }
}
