//! Where to find the log aggregator.
//!
//! `CENTRAL_LOG_IP` wins; otherwise a saved address in
//! `~/.central_log_config`; otherwise logs stay local.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_PORT: u16 = 9020;
pub const LOG_ADDRESS_ENV: &str = "CENTRAL_LOG_IP";
pub const LOG_CONFIG_FILE: &str = ".central_log_config";

/// Turns `host` or `host:port` into `host:port`. Blank input yields `None`.
pub fn normalize_address(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let has_port = raw
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if has_port {
        Some(raw.to_owned())
    } else {
        Some(format!("{raw}:{DEFAULT_LOG_PORT}"))
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_CONFIG_FILE))
}

/// Saved address, if the file exists and holds one.
pub fn load_saved_address(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(normalize_address(&contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn save_address(path: &Path, address: &str) -> io::Result<()> {
    fs::write(path, format!("{}\n", address.trim()))
}

/// Picks the environment value over the saved one.
pub fn resolve_address(env: Option<&str>, saved: Option<String>) -> Option<String> {
    env.and_then(normalize_address).or(saved)
}

/// Aggregator address for this process, if one is configured.
pub fn discover_address() -> Option<String> {
    let env = std::env::var(LOG_ADDRESS_ENV).ok();
    let saved = match config_path() {
        Some(path) => load_saved_address(&path).unwrap_or_default(),
        None => None,
    };
    resolve_address(env.as_deref(), saved)
}
