//! lircd Socket Protocol
//!
//! This crate provides types and utilities for speaking the line-oriented
//! text protocol of the lircd control socket. The daemon side of the socket
//! emits two kinds of traffic:
//!
//! - **Broadcast lines**: a single bare code string per decoded keypress,
//!   which may arrive at any time.
//! - **Reply envelopes**: the multi-line `BEGIN` ... `END` block answering a
//!   command, carrying a `SUCCESS`/`ERROR` status and an optional `DATA`
//!   payload.
//!
//! # Protocol Overview
//!
//! Everything on the wire is newline-terminated ASCII text:
//!
//! - **Commands** (client → daemon): a single formatted line, e.g.
//!   `SEND_ONCE <remote> <key>` or `LIST`.
//! - **Replies** (daemon → client): `BEGIN` / echoed command / `SUCCESS` or
//!   `ERROR` / optionally `DATA`, a line count and that many payload lines /
//!   `END`.
//! - **Configuration-change notifications**: `BEGIN` / `SIGHUP` / `END`,
//!   which the daemon may interleave before a pending reply.
//!
//! # Example
//!
//! ```rust,ignore
//! use lirc_protocol::{Request, ReplyParser};
//!
//! // Build a command line
//! let line = Request::ListRemotes.encode();
//!
//! // Parse a reply, one line at a time
//! let mut parser = ReplyParser::new();
//! for line in ["BEGIN", "LIST", "SUCCESS", "END"] {
//!     parser.feed(line)?;
//! }
//! assert!(parser.is_completed());
//! ```

mod codec;
mod commands;
mod error;
mod event;
mod reply;

pub use codec::*;
pub use commands::*;
pub use error::*;
pub use event::*;
pub use reply::*;
