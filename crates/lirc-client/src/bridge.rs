//! Async bridge over a blocking connection.
//!
//! [`AsyncConnection`] moves a connection into a dedicated blocking task
//! that becomes its sole reader, republishing each completed line on a
//! channel. Consumers see an unbounded, lazy sequence of lines, finite
//! only if the connection closes. No protocol logic lives here; lines
//! arrive already parsed out of the byte stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::connection::LineSource;

/// How long the reader task blocks per read before rechecking the stop
/// flag. Bounds how long teardown can take.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Async line stream over an exclusively owned connection.
///
/// Must be created inside a tokio runtime. Once bridged, the connection
/// has exactly one reader: the bridge task. The connection is released
/// when the task stops, on [`AsyncConnection::close`] or drop.
#[derive(Debug)]
pub struct AsyncConnection {
    lines: mpsc::UnboundedReceiver<String>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl AsyncConnection {
    /// Take ownership of `conn` and start bridging its lines.
    pub fn new<C>(mut conn: C) -> AsyncConnection
    where
        C: LineSource + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let reader = tokio::task::spawn_blocking(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                match conn.read_line(Some(STOP_POLL_INTERVAL)) {
                    Ok(Some(line)) => {
                        // A closed receiver means the consumer is gone.
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(%err, "bridge reader stopping");
                        break;
                    }
                }
            }
            debug!("bridge reader finished");
            // `conn` drops here, releasing the socket.
        });

        AsyncConnection {
            lines: rx,
            stop,
            reader: Some(reader),
        }
    }

    /// Await the next line.
    ///
    /// Returns `None` once the connection has closed and every buffered
    /// line has been consumed.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Stop bridging and release the connection.
    pub async fn close(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(reader) = self.reader.take() {
            let _ = reader.await;
        }
    }
}

impl Drop for AsyncConnection {
    fn drop(&mut self) {
        // Without an explicit close, still signal the reader so the task
        // and the connection wind down on their own.
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::RawConnection;
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    #[tokio::test]
    async fn test_lines_flow_through_bridge() {
        let (client, mut daemon) = UnixStream::pair().expect("socketpair");
        daemon.write_all(b"KEY_UP\nKEY_DOWN\n").unwrap();

        let mut bridge = AsyncConnection::new(RawConnection::from_stream(client));
        assert_eq!(bridge.next_line().await.as_deref(), Some("KEY_UP"));
        assert_eq!(bridge.next_line().await.as_deref(), Some("KEY_DOWN"));

        bridge.close().await;
    }

    #[tokio::test]
    async fn test_stream_ends_when_daemon_closes() {
        let (client, mut daemon) = UnixStream::pair().expect("socketpair");
        daemon.write_all(b"KEY_OK\n").unwrap();
        drop(daemon);

        let mut bridge = AsyncConnection::new(RawConnection::from_stream(client));
        assert_eq!(bridge.next_line().await.as_deref(), Some("KEY_OK"));
        // Connection closed: the sequence is finite.
        assert_eq!(bridge.next_line().await, None);
    }

    #[tokio::test]
    async fn test_close_stops_reader_task() {
        let (client, _daemon) = UnixStream::pair().expect("socketpair");
        let bridge = AsyncConnection::new(RawConnection::from_stream(client));
        // Returns once the reader task has observed the stop flag.
        bridge.close().await;
    }
}
