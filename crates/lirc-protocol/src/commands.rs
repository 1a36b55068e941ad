//! Requests that can be sent to the lircd control socket.
//!
//! Every request is a single space-separated line terminated by a newline.
//! The daemon answers each with a reply envelope (see [`crate::ReplyParser`]).
//! Formats follow the lircd(8) command set.

use crate::codec::LINE_TERMINATOR;

/// Requests understood by the lircd control socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// List the names of all configured remotes.
    ListRemotes,

    /// List the keys of one remote.
    ListKeys {
        /// Remote name as configured in the daemon.
        remote: String,
    },

    /// Send one or more keys once.
    SendOnce {
        /// Remote name.
        remote: String,
        /// Keys to send; must not be empty (checked by the client before
        /// any I/O happens).
        keys: Vec<String>,
    },

    /// Start repeating a key until a matching stop.
    StartRepeat {
        /// Remote name.
        remote: String,
        /// Key to repeat.
        key: String,
    },

    /// Stop repeating a key.
    StopRepeat {
        /// Remote name.
        remote: String,
        /// Key to stop.
        key: String,
    },

    /// Simulate a received keypress.
    Simulate {
        /// Remote name.
        remote: String,
        /// Key name.
        key: String,
        /// Repeat count, formatted as two zero-padded digits.
        repeat: u32,
        /// Key code, formatted as sixteen zero-padded digits.
        keycode: u64,
    },

    /// Select the transmitters to use, as a bitmask.
    SetTransmitters {
        /// Transmitter bitmask; bit 0 is transmitter 1.
        mask: u64,
    },

    /// Ask for the daemon version.
    Version,

    /// Set a driver option.
    DrvOption {
        /// Option name.
        option: String,
        /// Option value.
        value: String,
    },

    /// Start or stop logging of daemon input. Omitting the path stops
    /// logging.
    SetInputLog {
        /// Log file path, or `None` to stop logging.
        logfile: Option<String>,
    },
}

impl Request {
    /// Build a [`Request::SetTransmitters`] from 1-based transmitter
    /// indices, OR-ing each into the bitmask.
    pub fn set_transmitters_from_indices(indices: &[u32]) -> Request {
        let mut mask: u64 = 0;
        for &index in indices {
            mask |= 1 << (index - 1);
        }
        Request::SetTransmitters { mask }
    }

    /// Get the request line without the terminator.
    pub fn to_line(&self) -> String {
        match self {
            Request::ListRemotes => "LIST".to_string(),
            Request::ListKeys { remote } => format!("LIST {}", remote),
            Request::SendOnce { remote, keys } => {
                format!("SEND_ONCE {} {}", remote, keys.join(" "))
            }
            Request::StartRepeat { remote, key } => format!("SEND_START {} {}", remote, key),
            Request::StopRepeat { remote, key } => format!("SEND_STOP {} {}", remote, key),
            Request::Simulate {
                remote,
                key,
                repeat,
                keycode,
            } => format!("SIMULATE {:016} {:02} {} {}", keycode, repeat, key, remote),
            Request::SetTransmitters { mask } => format!("SET_TRANSMITTERS {}", mask),
            Request::Version => "VERSION".to_string(),
            Request::DrvOption { option, value } => format!("DRV_OPTION {} {}", option, value),
            Request::SetInputLog { logfile } => match logfile {
                Some(path) => format!("SET_INPUTLOG {}", path),
                None => "SET_INPUTLOG".to_string(),
            },
        }
    }

    /// Encode the request as bytes to send, including the terminator.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.to_line().into_bytes();
        buf.push(LINE_TERMINATOR);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_list_remotes() {
        assert_eq!(Request::ListRemotes.encode(), b"LIST\n");
    }

    #[test]
    fn test_encode_list_keys() {
        let req = Request::ListKeys {
            remote: "acme".to_string(),
        };
        assert_eq!(req.encode(), b"LIST acme\n");
    }

    #[test]
    fn test_encode_send_once_multiple_keys() {
        let req = Request::SendOnce {
            remote: "acme".to_string(),
            keys: vec!["KEY_UP".to_string(), "KEY_DOWN".to_string()],
        };
        assert_eq!(req.encode(), b"SEND_ONCE acme KEY_UP KEY_DOWN\n");
    }

    #[test]
    fn test_encode_repeat_pair() {
        let start = Request::StartRepeat {
            remote: "acme".to_string(),
            key: "KEY_VOLUMEUP".to_string(),
        };
        let stop = Request::StopRepeat {
            remote: "acme".to_string(),
            key: "KEY_VOLUMEUP".to_string(),
        };
        assert_eq!(start.encode(), b"SEND_START acme KEY_VOLUMEUP\n");
        assert_eq!(stop.encode(), b"SEND_STOP acme KEY_VOLUMEUP\n");
    }

    #[test]
    fn test_encode_simulate_zero_padding() {
        let req = Request::Simulate {
            remote: "acme".to_string(),
            key: "KEY_OK".to_string(),
            repeat: 1,
            keycode: 23,
        };
        assert_eq!(req.encode(), b"SIMULATE 0000000000000023 01 KEY_OK acme\n");
    }

    #[test]
    fn test_encode_set_transmitters_mask() {
        let req = Request::SetTransmitters { mask: 5 };
        assert_eq!(req.encode(), b"SET_TRANSMITTERS 5\n");
    }

    #[test]
    fn test_set_transmitters_from_indices() {
        // Transmitters 1 and 3 -> bits 0 and 2.
        let req = Request::set_transmitters_from_indices(&[1, 3]);
        assert_eq!(req, Request::SetTransmitters { mask: 0b101 });
        assert_eq!(req.encode(), b"SET_TRANSMITTERS 5\n");
    }

    #[test]
    fn test_encode_version() {
        assert_eq!(Request::Version.encode(), b"VERSION\n");
    }

    #[test]
    fn test_encode_drv_option() {
        let req = Request::DrvOption {
            option: "clientlog".to_string(),
            value: "debug".to_string(),
        };
        assert_eq!(req.encode(), b"DRV_OPTION clientlog debug\n");
    }

    #[test]
    fn test_encode_set_inputlog() {
        let on = Request::SetInputLog {
            logfile: Some("/tmp/input.log".to_string()),
        };
        let off = Request::SetInputLog { logfile: None };
        assert_eq!(on.encode(), b"SET_INPUTLOG /tmp/input.log\n");
        assert_eq!(off.encode(), b"SET_INPUTLOG\n");
    }
}
