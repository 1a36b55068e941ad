//! Client for the lircd control socket.
//!
//! This crate layers I/O on top of [`lirc_protocol`]: Unix-socket
//! connections with timeout-bounded line reads, a command runner that
//! drives a reply parser to completion, and an async bridge for consuming
//! broadcast lines from tokio code.
//!
//! # Receiving keypresses
//!
//! ```rust,ignore
//! use lirc_client::RawConnection;
//!
//! let mut conn = RawConnection::connect(None)?;
//! loop {
//!     if let Some(line) = conn.read_line(None)? {
//!         println!("{line}");
//!     }
//! }
//! ```
//!
//! # Sending commands
//!
//! ```rust,ignore
//! use lirc_client::CommandConnection;
//! use lirc_protocol::Request;
//!
//! let mut conn = CommandConnection::connect(None)?;
//! let reply = conn.run(&Request::ListRemotes, Some(Duration::from_secs(1)))?;
//! for remote in &reply.data {
//!     println!("{remote}");
//! }
//! ```

mod bridge;
mod command;
mod connection;
mod error;
pub mod paths;
mod translate;

pub use bridge::*;
pub use command::*;
pub use connection::*;
pub use error::*;
pub use translate::*;
