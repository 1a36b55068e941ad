//! Socket connections to the lircd daemon.
//!
//! [`RawConnection`] owns the Unix stream socket and a [`LineBuffer`],
//! exposing timeout-bounded line reads. [`CommandConnection`] composes a
//! raw connection with the send capability a command exchange needs.
//!
//! A single connection handles one reader at a time: the protocol is
//! strictly request/reply with broadcasts in between, so there is no
//! internal locking. Sharing one connection between threads is a caller
//! error.

use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::{debug, trace};

use lirc_protocol::{LineBuffer, READ_CHUNK_SIZE};

use crate::error::{ClientError, ClientResult};
use crate::paths;

/// A source of protocol lines with timeout-bounded reads.
///
/// The seam consumed by wrappers that do not care whether lines come from a
/// raw or a command-capable connection (the async bridge, multiplexers).
pub trait LineSource {
    /// Read the next complete line. Timeout semantics as
    /// [`RawConnection::read_line`].
    fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>>;

    /// True iff a complete line is already buffered. No I/O.
    fn has_line(&self) -> bool;
}

/// Connection receiving raw code strings from the daemon.
///
/// Reads assemble newline-terminated lines from the socket, waiting at most
/// the given timeout in total even when a line arrives in several pieces.
/// Dropping the connection (or calling [`RawConnection::close`]) releases
/// the socket; ownership makes use-after-close unrepresentable.
#[derive(Debug)]
pub struct RawConnection {
    stream: UnixStream,
    buffer: LineBuffer,
}

impl RawConnection {
    /// Connect to the daemon socket.
    ///
    /// With `None` the path is resolved via
    /// [`paths::default_socket_path`].
    pub fn connect(socket_path: Option<&Path>) -> ClientResult<RawConnection> {
        let path = match socket_path {
            Some(path) => path.to_path_buf(),
            None => paths::default_socket_path(),
        };
        debug!(path = %path.display(), "connecting to lircd socket");
        let stream = UnixStream::connect(&path)?;
        Ok(RawConnection::from_stream(stream))
    }

    /// Wrap an already-connected stream.
    pub fn from_stream(stream: UnixStream) -> RawConnection {
        RawConnection {
            stream,
            buffer: LineBuffer::new(),
        }
    }

    /// Read the next line from the daemon.
    ///
    /// - `None`: block until a line is available.
    /// - `Some(0)`: poll once, return immediately.
    /// - `Some(t)`: wait at most `t` in total, across however many partial
    ///   reads it takes to assemble a line.
    ///
    /// Returns `Ok(None)` if the timeout elapsed without a complete line;
    /// this is the recoverable, raw-read flavor of timeout. A daemon that
    /// closed the socket surfaces as [`ClientError::ConnectionClosed`].
    pub fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            if let Some(line) = self.buffer.next_line() {
                trace!(?line, "line from daemon");
                return Ok(Some(line));
            }

            let poll_timeout = match deadline {
                None => PollTimeout::NONE,
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    PollTimeout::try_from(remaining).unwrap_or(PollTimeout::MAX)
                }
            };

            let ready = {
                let mut fds = [PollFd::new(self.stream.as_fd(), PollFlags::POLLIN)];
                match poll(&mut fds, poll_timeout) {
                    Ok(n) => n,
                    Err(Errno::EINTR) => continue,
                    Err(errno) => {
                        return Err(std::io::Error::from_raw_os_error(errno as i32).into())
                    }
                }
            };
            if ready == 0 {
                return Ok(None);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let n = self.stream.read(&mut chunk)?;
            if n == 0 {
                return Err(ClientError::ConnectionClosed);
            }
            self.buffer.push(&chunk[..n]);
        }
    }

    /// True iff a complete line is already buffered. No I/O.
    pub fn has_line(&self) -> bool {
        self.buffer.has_line()
    }

    /// Close the connection, releasing the socket.
    pub fn close(self) {
        drop(self);
    }
}

impl LineSource for RawConnection {
    fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>> {
        RawConnection::read_line(self, timeout)
    }

    fn has_line(&self) -> bool {
        RawConnection::has_line(self)
    }
}

impl AsRawFd for RawConnection {
    /// The handle to use with select/poll when multiplexing this
    /// connection with others.
    fn as_raw_fd(&self) -> RawFd {
        self.stream.as_raw_fd()
    }
}

impl AsFd for RawConnection {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.stream.as_fd()
    }
}

/// A [`RawConnection`] that can also send request lines.
#[derive(Debug)]
pub struct CommandConnection {
    inner: RawConnection,
}

impl CommandConnection {
    /// Connect to the daemon socket; path resolution as
    /// [`RawConnection::connect`].
    pub fn connect(socket_path: Option<&Path>) -> ClientResult<CommandConnection> {
        Ok(CommandConnection {
            inner: RawConnection::connect(socket_path)?,
        })
    }

    /// Add the send capability to an existing connection.
    pub fn from_raw(inner: RawConnection) -> CommandConnection {
        CommandConnection { inner }
    }

    /// Send a request line, looping until every byte is written.
    pub fn send(&mut self, data: &[u8]) -> ClientResult<()> {
        self.inner.stream.write_all(data)?;
        Ok(())
    }

    /// See [`RawConnection::read_line`].
    pub fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>> {
        self.inner.read_line(timeout)
    }

    /// See [`RawConnection::has_line`].
    pub fn has_line(&self) -> bool {
        self.inner.has_line()
    }

    /// Access the wrapped connection.
    pub fn raw(&self) -> &RawConnection {
        &self.inner
    }

    /// Give up the send capability, returning the wrapped connection.
    pub fn into_raw(self) -> RawConnection {
        self.inner
    }

    /// Close the connection, releasing the socket.
    pub fn close(self) {
        drop(self);
    }
}

impl LineSource for CommandConnection {
    fn read_line(&mut self, timeout: Option<Duration>) -> ClientResult<Option<String>> {
        CommandConnection::read_line(self, timeout)
    }

    fn has_line(&self) -> bool {
        CommandConnection::has_line(self)
    }
}

impl AsRawFd for CommandConnection {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

impl AsFd for CommandConnection {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.as_fd()
    }
}
