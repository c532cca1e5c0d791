use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{InsightsError, InsightsResult};

pub const DEFAULT_ADDRESS: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_FETCH_CONCURRENCY: usize = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub request_timeout: Duration,
    /// Days fetched in parallel per analysis; 1 keeps fetches sequential.
    pub fetch_concurrency: usize,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(DEFAULT_ADDRESS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            log_filter: "info".into(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>) -> InsightsResult<Option<T>> {
    match raw.filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| InsightsError::Config(format!("{name} has an invalid value: {v}"))),
    }
}

impl ServerConfig {
    pub fn from_env() -> InsightsResult<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reads through `get`, so tests
    /// never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> InsightsResult<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let address = parse_var::<SocketAddr>("ADDRESS", get("ADDRESS"))?.unwrap_or(defaults.address);
        let request_timeout = parse_var::<u64>("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"))?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let fetch_concurrency =
            parse_var::<usize>("SLEEP_FETCH_CONCURRENCY", get("SLEEP_FETCH_CONCURRENCY"))?
                .unwrap_or(defaults.fetch_concurrency);
        if fetch_concurrency == 0 {
            return Err(InsightsError::Config(
                "SLEEP_FETCH_CONCURRENCY must be at least 1".into(),
            ));
        }
        let log_filter = get("SLEEP_INSIGHTS_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            address,
            request_timeout,
            fetch_concurrency,
            log_filter,
        })
    }
}
