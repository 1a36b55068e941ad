//! Default path discovery for the daemon socket and the lircrc file.
//!
//! The connection constructors take an explicit path and know nothing
//! about this policy; these helpers implement the conventional fallback
//! chains for callers that pass none.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable overriding the daemon socket path.
pub const SOCKET_PATH_ENV: &str = "LIRC_SOCKET_PATH";

/// Daemon options file consulted for the socket path.
pub const OPTIONS_FILE_PATH: &str = "/etc/lirc/lirc_options.conf";

/// Hardcoded socket fallback, possibly non-existing.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/lirc/lircd";

/// System-wide lircrc fallback, possibly non-existing.
pub const DEFAULT_LIRCRC_PATH: &str = "/etc/lirc/lircrc";

/// Resolve the daemon socket path, using (falling priority):
///
/// - the `LIRC_SOCKET_PATH` environment variable;
/// - the `output` value in the `[lircd]` section of
///   `/etc/lirc/lirc_options.conf`, if that file names an existing path;
/// - `/var/run/lirc/lircd`, whether it exists or not.
pub fn default_socket_path() -> PathBuf {
    if let Ok(path) = env::var(SOCKET_PATH_ENV) {
        return PathBuf::from(path);
    }
    if let Some(path) = socket_path_from_options(Path::new(OPTIONS_FILE_PATH)) {
        if path.exists() {
            return path;
        }
        debug!(path = %path.display(), "options file names a non-existing socket, ignoring");
    }
    PathBuf::from(DEFAULT_SOCKET_PATH)
}

/// Scan a lirc_options.conf for the `[lircd]` section's `output` value.
///
/// The file is a plain `[section]` / `key = value` format; only the one
/// key is of interest here, so the scan stays minimal.
fn socket_path_from_options(options: &Path) -> Option<PathBuf> {
    let text = fs::read_to_string(options).ok()?;
    let mut in_lircd = false;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_lircd = line == "[lircd]";
            continue;
        }
        if !in_lircd {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "output" {
                return Some(PathBuf::from(value.trim()));
            }
        }
    }
    None
}

/// Resolve the lircrc configuration file path, using (falling priority):
///
/// - `$XDG_CONFIG_HOME/lircrc`, if set and the file exists;
/// - `~/.config/lircrc`, if it exists;
/// - `~/.lircrc`, if it exists;
/// - `/etc/lirc/lircrc`, whether it exists or not.
pub fn default_lircrc_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("lircrc");
        if path.exists() {
            return path;
        }
    }
    if let Some(home) = dirs::home_dir() {
        let path = home.join(".lircrc");
        if path.exists() {
            return path;
        }
    }
    PathBuf::from(DEFAULT_LIRCRC_PATH)
}
