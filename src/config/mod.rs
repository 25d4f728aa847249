//! Process-wide configuration, read once at startup.
//!
//! Credentials come from the environment. Everything else has a default
//! that the binary may override from its command line.

use std::{
    env, error,
    fmt::{self, Display, Formatter},
    str::FromStr,
    time::Duration,
};

use crate::bot::Mode;

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_API_TOKEN";

/// Environment variable holding the YouTube Data API key.
pub const YOUTUBE_KEY_VAR: &str = "YOUTUBE_API_KEY";

/// Default timeout applied to every YouTube call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// YouTube video category for Music.
pub const MUSIC_CATEGORY: &str = "10";

pub const DEFAULT_REGION: &str = "US";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    Missing(&'static str),

    /// A value was present but could not be used.
    Invalid { name: &'static str, reason: String },
}

impl error::Error for ConfigError {}
impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} not found in environment variables", name),
            ConfigError::Invalid { name, reason } => write!(f, "invalid {}: {}", name, reason),
        }
    }
}

/// Immutable configuration handed to every client constructor.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub youtube_api_key: String,

    /// Upper bound on a single YouTube request.
    pub timeout: Duration,

    pub trending_category: String,
    pub trending_region: String,

    /// Mode used for plain text messages.
    pub default_mode: Mode,

    /// Seed for the random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Config {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup. The Telegram
    /// token is checked first, so it is the one reported when both are absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            telegram_token: required(TELEGRAM_TOKEN_VAR)?,
            youtube_api_key: required(YOUTUBE_KEY_VAR)?,
            timeout: DEFAULT_TIMEOUT,
            trending_category: MUSIC_CATEGORY.to_string(),
            trending_region: DEFAULT_REGION.to_string(),
            default_mode: Mode::FullMetadata,
            seed: None,
        })
    }

    /// Override the request timeout from a number of seconds.
    pub fn with_timeout_secs(mut self, secs: &str) -> Result<Self, ConfigError> {
        let secs = u64::from_str(secs.trim()).map_err(|e| ConfigError::Invalid {
            name: "timeout",
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::Invalid {
                name: "timeout",
                reason: "must be at least one second".to_string(),
            });
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn with_mode(mut self, mode: &str) -> Result<Self, ConfigError> {
        self.default_mode = Mode::from_str(mode).map_err(|e| ConfigError::Invalid {
            name: "mode",
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: &str) -> Result<Self, ConfigError> {
        self.seed = Some(u64::from_str(seed.trim()).map_err(|e| ConfigError::Invalid {
            name: "seed",
            reason: e.to_string(),
        })?);
        Ok(self)
    }
}
