//! Runtime configuration parsed from environment variables.

use crate::error::GridError;
use crate::grid::Grid;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required env var {var}")]
    Missing { var: &'static str },

    /// A variable is set but its value does not parse.
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin serving `/api/places/{id}/pixels`, without a trailing slash.
    pub base_url: String,
    /// Session cookie forwarded with the snapshot request.
    pub session_cookie: Option<String>,
    pub timeouts: Timeouts,
    /// Return malformed inbound events to the host instead of logging them.
    pub strict_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_cookie: None,
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            strict_events: false,
        }
    }
}

impl Config {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PLACE_BASE_URL`: default `http://localhost:4000`
    /// - `PLACE_SESSION_COOKIE`: sent as the `Cookie` header
    /// - `PLACE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PLACE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `PLACE_STRICT_EVENTS`: `1`/`true`/`yes` to enable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable numbers or flags.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable numbers or flags.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("PLACE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let session_cookie = lookup("PLACE_SESSION_COOKIE");
        let timeouts = Timeouts {
            request_secs: parse_u64(&lookup, "PLACE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "PLACE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let strict_events = match lookup("PLACE_STRICT_EVENTS") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid { var: "PLACE_STRICT_EVENTS", value: raw })?,
        };

        Ok(Self { base_url, session_cookie, timeouts, strict_events })
    }
}

/// Read the grid construction parameters `PLACE_ID` and `PLACE_SIZE`.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] when either is unset and
/// [`ConfigError::Invalid`] when the size is not a positive integer or is
/// too large to allocate a raster for.
pub fn grid_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Grid, ConfigError> {
    let id = lookup("PLACE_ID").ok_or(ConfigError::Missing { var: "PLACE_ID" })?;
    let raw = lookup("PLACE_SIZE").ok_or(ConfigError::Missing { var: "PLACE_SIZE" })?;
    let size = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid { var: "PLACE_SIZE", value: raw.clone() })?;
    Grid::new(id.clone(), size).map_err(|e| match e {
        GridError::EmptyId => ConfigError::Invalid { var: "PLACE_ID", value: id },
        _ => ConfigError::Invalid { var: "PLACE_SIZE", value: raw },
    })
}

/// Process-environment lookup treating blank values as unset.
#[must_use]
pub fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
