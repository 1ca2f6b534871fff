use std::env;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; TripBoard/1.0; +https://tripboard.app)";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("{name} must be a positive number of bytes, got {value:?}")]
    InvalidSize { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub insecure_ssl: bool,
    /// Page bodies are cut off after this many bytes.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insecure_ssl: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Load settings from the process environment, after an optional `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let fetch_timeout = match lookup("TRIPBOARD_FETCH_TIMEOUT_SECS") {
            Some(raw) => parse_timeout("TRIPBOARD_FETCH_TIMEOUT_SECS", &raw)?,
            None => defaults.fetch_timeout,
        };

        let max_body_bytes = match lookup("TRIPBOARD_MAX_BODY_BYTES") {
            Some(raw) => parse_size("TRIPBOARD_MAX_BODY_BYTES", &raw)?,
            None => defaults.max_body_bytes,
        };

        Ok(Config {
            bind_addr: lookup("TRIPBOARD_BIND").unwrap_or(defaults.bind_addr),
            fetch_timeout,
            user_agent: lookup("TRIPBOARD_USER_AGENT").unwrap_or(defaults.user_agent),
            insecure_ssl: lookup("TRIPBOARD_INSECURE_SSL").as_deref() == Some("1"),
            max_body_bytes,
        })
    }
}

fn parse_timeout(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            name,
            value: raw.to_string(),
        }),
    }
}

fn parse_size(name: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(bytes) if bytes > 0 => Ok(bytes),
        _ => Err(ConfigError::InvalidSize {
            name,
            value: raw.to_string(),
        }),
    }
}
