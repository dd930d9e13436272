//! Process-wide settings read once from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `EASEL_FONT_DIR` | `<crate>/fonts` | root of the bundled font catalog (build-time path) |
//! | `EASEL_HTTP_TIMEOUT_SECS` | `30` | global timeout of one remote fetch |
//! | `EASEL_HTTP_MAX_BYTES` | `33554432` | largest accepted remote body |
//!
//! Unparseable or zero values fall back to the default.

use std::{
    path::PathBuf,
    sync::OnceLock,
    time::Duration,
};

pub const FONT_DIR_VAR: &str = "EASEL_FONT_DIR";
pub const HTTP_TIMEOUT_VAR: &str = "EASEL_HTTP_TIMEOUT_SECS";
pub const HTTP_MAX_BYTES_VAR: &str = "EASEL_HTTP_MAX_BYTES";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HTTP_MAX_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub font_dir: PathBuf,
    pub http_timeout: Duration,
    pub http_max_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_dir: default_font_dir(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            http_max_bytes: DEFAULT_HTTP_MAX_BYTES,
        }
    }
}

impl Settings {
    /// Build settings from the current process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let font_dir = lookup(FONT_DIR_VAR)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.font_dir);
        let http_timeout = lookup(HTTP_TIMEOUT_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let http_max_bytes = lookup(HTTP_MAX_BYTES_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.http_max_bytes);
        Self {
            font_dir,
            http_timeout,
            http_max_bytes,
        }
    }
}

/// Settings shared by the whole process, resolved on first use.
pub fn settings() -> &'static Settings {
    static SETTINGS: OnceLock<Settings> = OnceLock::new();
    SETTINGS.get_or_init(Settings::from_env)
}

/// Absolute `fonts/` path of the build checkout; relocated binaries need `EASEL_FONT_DIR`.
fn default_font_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fonts")
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
