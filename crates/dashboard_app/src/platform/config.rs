//! Environment-driven settings for the dashboard binary.

use std::time::Duration;

use dashboard_client::ClientSettings;
use dashboard_core::Timings;

use super::logging::LogDestination;

pub const ENV_BASE_URL: &str = "DASHBOARD_BASE_URL";
pub const ENV_POLL_INTERVAL: &str = "DASHBOARD_POLL_INTERVAL_SECS";
pub const ENV_LOG: &str = "DASHBOARD_LOG";
pub const ENV_CONNECT_TIMEOUT: &str = "DASHBOARD_CONNECT_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:8081";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
    #[error("{var} must be one of file, terminal, both; got {value:?}")]
    InvalidLogDestination { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    pub log_destination: LogDestination,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            log_destination: LogDestination::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = read(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(raw) = read(ENV_POLL_INTERVAL) {
            config.poll_interval = parse_seconds(ENV_POLL_INTERVAL, raw)?;
        }
        if let Some(raw) = read(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout = parse_seconds(ENV_CONNECT_TIMEOUT, raw)?;
        }
        if let Some(raw) = read(ENV_LOG) {
            config.log_destination = match LogDestination::parse(&raw) {
                Some(destination) => destination,
                None => {
                    return Err(ConfigError::InvalidLogDestination {
                        var: ENV_LOG,
                        value: raw,
                    })
                }
            };
        }
        Ok(config)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: self.connect_timeout,
            ..ClientSettings::default()
        }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            poll_interval: self.poll_interval,
            ..Timings::default()
        }
    }
}

fn parse_seconds(var: &'static str, raw: String) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds { var, value: raw }),
    }
}
