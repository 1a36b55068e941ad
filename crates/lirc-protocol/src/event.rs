//! Typed view of broadcast code strings.
//!
//! Outside reply envelopes the daemon broadcasts one line per decoded
//! keypress:
//!
//! ```text
//! <code> <repeat count> <key name> <remote name>
//! ```
//!
//! where `code` and `repeat count` are hexadecimal, per lircd(8). Raw lines
//! are what the streaming interfaces hand out; this parse is offered for
//! callers that want the fields.

use crate::error::{ProtoResult, ProtocolError};

/// One decoded keypress broadcast by the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypress {
    /// Scan code of the key, from the remote's config.
    pub code: u64,
    /// Repeat count; 0 for the initial press, then counting up while the
    /// key is held.
    pub repeat: u32,
    /// Key name, e.g. `KEY_VOLUMEUP`.
    pub key: String,
    /// Name of the remote the key belongs to.
    pub remote: String,
}

impl Keypress {
    /// Parse a broadcast line.
    pub fn parse(line: &str) -> ProtoResult<Keypress> {
        let mut parts = line.split_whitespace();
        let (code, repeat, key, remote) = match (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) {
            (Some(code), Some(repeat), Some(key), Some(remote), None) => {
                (code, repeat, key, remote)
            }
            _ => return Err(ProtocolError::BadKeypress(line.to_string())),
        };

        let code = u64::from_str_radix(code, 16)
            .map_err(|_| ProtocolError::BadKeypress(line.to_string()))?;
        let repeat = u32::from_str_radix(repeat, 16)
            .map_err(|_| ProtocolError::BadKeypress(line.to_string()))?;

        Ok(Keypress {
            code,
            repeat,
            key: key.to_string(),
            remote: remote.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keypress() {
        let event = Keypress::parse("0000000000f40bf0 00 KEY_UP acme").unwrap();
        assert_eq!(event.code, 0x00f4_0bf0);
        assert_eq!(event.repeat, 0);
        assert_eq!(event.key, "KEY_UP");
        assert_eq!(event.remote, "acme");
    }

    #[test]
    fn test_parse_repeat_count_is_hex() {
        let event = Keypress::parse("0000000000f40bf0 0a KEY_UP acme").unwrap();
        assert_eq!(event.repeat, 10);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(Keypress::parse("0000000000f40bf0 00 KEY_UP").is_err());
        assert!(Keypress::parse("0000000000f40bf0 00 KEY_UP acme extra").is_err());
        assert!(Keypress::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex_code() {
        assert!(Keypress::parse("zzzz 00 KEY_UP acme").is_err());
    }
}
