//! Viewer Configuration
//!
//! Settings for the viewer binary, loaded from environment variables.
//!
//! - `TRADE_VIEWER_URL`: feed address to connect to at startup (optional;
//!   a positional argument takes precedence)
//! - `TRADE_VIEWER_HISTORY_CAPACITY`: max trades retained (default: 100)
//! - `TRADE_VIEWER_REFRESH_MS`: table refresh interval (default: 1000)

use std::time::Duration;

use crate::domain::history::DEFAULT_CAPACITY;

/// Default table refresh interval.
const DEFAULT_REFRESH_MS: u64 = 1000;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds a non-numeric value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Viewer settings.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Feed address to connect to at startup, if any.
    pub url: Option<String>,
    /// Maximum number of trades retained.
    pub history_capacity: usize,
    /// How often the table is re-rendered.
    pub refresh_interval: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            url: None,
            history_capacity: DEFAULT_CAPACITY,
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_MS),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("TRADE_VIEWER_URL").ok(),
            std::env::var("TRADE_VIEWER_HISTORY_CAPACITY").ok(),
            std::env::var("TRADE_VIEWER_REFRESH_MS").ok(),
        )
    }

    fn from_vars(
        url: Option<String>,
        capacity: Option<String>,
        refresh_ms: Option<String>,
    ) -> Result<Self, ConfigError> {
        let history_capacity =
            parse_or(capacity, "TRADE_VIEWER_HISTORY_CAPACITY", DEFAULT_CAPACITY)?;
        let refresh_ms = parse_or(refresh_ms, "TRADE_VIEWER_REFRESH_MS", DEFAULT_REFRESH_MS)?;

        Ok(Self {
            url: url.filter(|u| !u.trim().is_empty()),
            history_capacity,
            refresh_interval: Duration::from_millis(refresh_ms),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}
