//! Reply parsing for the lircd control protocol.
//!
//! A command reply is a multi-line envelope:
//!
//! ```text
//! BEGIN
//! <echoed command line>
//! SUCCESS | ERROR
//! [DATA
//!  <n>
//!  <n payload lines>]
//! END
//! ```
//!
//! The daemon may also interleave a configuration-change notification
//! (`BEGIN` / `SIGHUP` / `END`) in front of a pending reply; the parser
//! records it and re-arms for the real envelope. The wire format has no
//! length framing, only sentinel tokens, so every line is validated against
//! the current state and anything unexpected fails immediately instead of
//! corrupting a later reply.

use crate::error::{ProtoResult, ProtocolError};

/// Overall outcome of parsing one reply.
///
/// Distinct from the daemon-level `SUCCESS`/`ERROR` status: `Ok` only means
/// a complete, well-formed envelope was consumed. `Fail` is never produced
/// by the parser itself; it is reserved for callers that want to record
/// "gave up" (e.g. after a timeout) on a reply they will not finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyResult {
    /// Parsing has not reached the end of the envelope.
    Incomplete,
    /// A complete envelope was parsed.
    Ok,
    /// Caller-recorded failure; the parser never sets this.
    Fail,
}

/// The status and payload parsed from a command reply.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Parse outcome, `Ok` once the terminal state is reached.
    pub result: ReplyResult,
    /// Daemon status: `Some(true)` on SUCCESS, `Some(false)` on ERROR,
    /// `None` while incomplete. Only meaningful when `result` is `Ok`.
    pub success: Option<bool>,
    /// DATA payload lines, in arrival order.
    pub data: Vec<String>,
    /// True once a SIGHUP notification envelope has been observed.
    pub sighup: bool,
    /// Most recently fed line, kept for error reporting.
    pub last_line: String,
}

impl Reply {
    fn new() -> Self {
        Reply {
            result: ReplyResult::Incomplete,
            success: None,
            data: Vec::new(),
            sighup: false,
            last_line: String::new(),
        }
    }
}

impl Default for Reply {
    fn default() -> Self {
        Reply::new()
    }
}

/// Parser FSM state. The state set is closed; transitions are fully
/// enumerated in `ReplyParser::feed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    Command,
    Result,
    Data,
    LineCount,
    Lines,
    End,
    SighupEnd,
    Done,
    /// Entered after a protocol violation; the parser must not be reused.
    Poisoned,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Begin => "BEGIN",
            State::Command => "COMMAND",
            State::Result => "RESULT",
            State::Data => "DATA",
            State::LineCount => "LINE_COUNT",
            State::Lines => "LINES",
            State::End => "END",
            State::SighupEnd => "SIGHUP_END",
            State::Done => "DONE",
            State::Poisoned => "POISONED",
        }
    }
}

/// Consumes a command reply one line at a time.
///
/// One parser instance corresponds to one command/reply exchange, except
/// that a SIGHUP notification envelope re-arms the same instance for the
/// follow-up reply. After a [`ProtocolError::BadPacket`] the parser is
/// poisoned and every further `feed` fails.
#[derive(Debug)]
pub struct ReplyParser {
    reply: Reply,
    state: State,
    lines_expected: usize,
}

impl ReplyParser {
    /// Create a parser with an empty [`Reply`].
    pub fn new() -> Self {
        ReplyParser {
            reply: Reply::new(),
            state: State::Begin,
            lines_expected: 0,
        }
    }

    /// True once no more reply input is required.
    pub fn is_completed(&self) -> bool {
        self.reply.result != ReplyResult::Incomplete
    }

    /// The reply accumulated so far.
    pub fn reply(&self) -> &Reply {
        &self.reply
    }

    /// Mutable access to the reply, for callers recording
    /// [`ReplyResult::Fail`] on an abandoned exchange.
    pub fn reply_mut(&mut self) -> &mut Reply {
        &mut self.reply
    }

    /// Consume the parser and take the reply.
    pub fn into_reply(self) -> Reply {
        self.reply
    }

    /// Feed one line into the FSM.
    ///
    /// Surrounding whitespace is stripped first; a line that is empty after
    /// stripping is ignored without a state change. Any line that is not
    /// valid for the current state poisons the parser and returns
    /// [`ProtocolError::BadPacket`] carrying the line and state.
    pub fn feed(&mut self, line: &str) -> ProtoResult<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        self.reply.last_line = line.to_string();

        self.state = match self.state {
            State::Begin => {
                if line == "BEGIN" {
                    State::Command
                } else {
                    return self.bad_packet(line);
                }
            }
            // The echoed command line; any content is accepted.
            State::Command => State::Result,
            State::Result => match line {
                "SUCCESS" | "ERROR" => {
                    self.reply.success = Some(line == "SUCCESS");
                    State::Data
                }
                "SIGHUP" => {
                    self.reply.sighup = true;
                    State::SighupEnd
                }
                _ => return self.bad_packet(line),
            },
            State::Data => match line {
                "END" => State::Done,
                "DATA" => State::LineCount,
                _ => return self.bad_packet(line),
            },
            State::LineCount => match line.parse::<usize>() {
                Ok(0) => State::End,
                Ok(n) => {
                    self.lines_expected = n;
                    State::Lines
                }
                Err(_) => return self.bad_packet(line),
            },
            State::Lines => {
                self.reply.data.push(line.to_string());
                if self.reply.data.len() >= self.lines_expected {
                    State::End
                } else {
                    State::Lines
                }
            }
            State::End => {
                if line == "END" {
                    State::Done
                } else {
                    return self.bad_packet(line);
                }
            }
            // A SIGHUP envelope closes and the parser re-arms for the
            // genuine reply.
            State::SighupEnd => {
                if line == "END" {
                    State::Begin
                } else {
                    return self.bad_packet(line);
                }
            }
            State::Done => return self.bad_packet(line),
            State::Poisoned => return Err(ProtocolError::Poisoned),
        };

        log::trace!("reply parser: {:?} -> {}", line, self.state.name());
        if self.state == State::Done {
            self.reply.result = ReplyResult::Ok;
        }
        Ok(())
    }

    fn bad_packet(&mut self, line: &str) -> ProtoResult<()> {
        let state = self.state.name();
        self.state = State::Poisoned;
        Err(ProtocolError::BadPacket {
            line: line.to_string(),
            state,
        })
    }
}

impl Default for ReplyParser {
    fn default() -> Self {
        ReplyParser::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut ReplyParser, lines: &[&str]) {
        for line in lines {
            parser.feed(line).expect("line should parse");
        }
    }

    #[test]
    fn test_success_reply_with_data() {
        let mut parser = ReplyParser::new();
        feed_all(
            &mut parser,
            &["BEGIN", "LIST", "SUCCESS", "DATA", "2", "foo", "bar", "END"],
        );

        assert!(parser.is_completed());
        let reply = parser.into_reply();
        assert_eq!(reply.result, ReplyResult::Ok);
        assert_eq!(reply.success, Some(true));
        assert_eq!(reply.data, vec!["foo", "bar"]);
        assert!(!reply.sighup);
    }

    #[test]
    fn test_error_reply_without_data() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "VERSION", "ERROR", "END"]);

        let reply = parser.into_reply();
        assert_eq!(reply.result, ReplyResult::Ok);
        assert_eq!(reply.success, Some(false));
        assert!(reply.data.is_empty());
    }

    #[test]
    fn test_zero_line_count_skips_lines_state() {
        let mut parser = ReplyParser::new();
        feed_all(
            &mut parser,
            &["BEGIN", "LIST unknown", "SUCCESS", "DATA", "0", "END"],
        );

        assert!(parser.is_completed());
        assert!(parser.reply().data.is_empty());
    }

    #[test]
    fn test_data_lines_kept_in_arrival_order() {
        let mut parser = ReplyParser::new();
        feed_all(
            &mut parser,
            &["BEGIN", "LIST acme", "SUCCESS", "DATA", "3", "KEY_1", "KEY_2", "KEY_3", "END"],
        );

        assert_eq!(parser.reply().data, vec!["KEY_1", "KEY_2", "KEY_3"]);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["", "BEGIN", "  ", "VERSION", "SUCCESS", "", "END"]);

        assert!(parser.is_completed());
        assert_eq!(parser.reply().success, Some(true));
    }

    #[test]
    fn test_sighup_envelope_rearms_for_real_reply() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "SIGHUP", "END"]);

        // The notification alone completes nothing.
        assert!(!parser.is_completed());
        assert!(parser.reply().sighup);
        assert_eq!(parser.reply().result, ReplyResult::Incomplete);

        // The same instance then parses the genuine reply.
        feed_all(&mut parser, &["BEGIN", "VERSION", "SUCCESS", "DATA", "1", "0.10.2", "END"]);
        assert!(parser.is_completed());
        let reply = parser.into_reply();
        assert_eq!(reply.result, ReplyResult::Ok);
        assert!(reply.sighup);
        assert_eq!(reply.data, vec!["0.10.2"]);
    }

    #[test]
    fn test_garbage_in_begin_state() {
        let mut parser = ReplyParser::new();
        let err = parser.feed("GARBAGE").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::BadPacket {
                line: "GARBAGE".to_string(),
                state: "BEGIN",
            }
        );
    }

    #[test]
    fn test_data_token_in_begin_state() {
        let mut parser = ReplyParser::new();
        let err = parser.feed("DATA").unwrap_err();
        assert!(matches!(err, ProtocolError::BadPacket { ref state, .. } if *state == "BEGIN"));
    }

    #[test]
    fn test_bad_result_token() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "LIST"]);
        let err = parser.feed("MAYBE").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::BadPacket {
                line: "MAYBE".to_string(),
                state: "RESULT",
            }
        );
    }

    #[test]
    fn test_non_integer_line_count() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "LIST", "SUCCESS", "DATA"]);
        let err = parser.feed("two").unwrap_err();
        assert!(matches!(err, ProtocolError::BadPacket { ref state, .. } if *state == "LINE_COUNT"));
    }

    #[test]
    fn test_missing_end_after_data_lines() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "LIST", "SUCCESS", "DATA", "1", "foo"]);
        let err = parser.feed("BEGIN").unwrap_err();
        assert!(matches!(err, ProtocolError::BadPacket { ref state, .. } if *state == "END"));
    }

    #[test]
    fn test_poisoned_parser_rejects_further_input() {
        let mut parser = ReplyParser::new();
        assert!(parser.feed("GARBAGE").is_err());
        assert_eq!(parser.feed("BEGIN").unwrap_err(), ProtocolError::Poisoned);
    }

    #[test]
    fn test_feed_after_done_is_a_violation() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "VERSION", "SUCCESS", "END"]);
        let err = parser.feed("BEGIN").unwrap_err();
        assert!(matches!(err, ProtocolError::BadPacket { ref state, .. } if *state == "DONE"));
    }

    #[test]
    fn test_last_line_tracks_input() {
        let mut parser = ReplyParser::new();
        feed_all(&mut parser, &["BEGIN", "LIST"]);
        assert_eq!(parser.reply().last_line, "LIST");
    }

    #[test]
    fn test_caller_can_record_fail() {
        let mut parser = ReplyParser::new();
        parser.feed("BEGIN").unwrap();
        parser.reply_mut().result = ReplyResult::Fail;
        assert!(parser.is_completed());
        assert_eq!(parser.reply().result, ReplyResult::Fail);
    }
}
