use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub refresh_delay: Duration,
    pub checkout_delay: Duration,
    pub signup_delay: Duration,
    /// Idle time after which a session is dropped.
    pub session_ttl: Duration,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            refresh_delay: Duration::from_millis(1000),
            checkout_delay: Duration::from_millis(3000),
            signup_delay: Duration::from_millis(2000),
            session_ttl: Duration::from_secs(30 * 60),
            log_filter: "stockscan=info,tower_http=info".into(),
        }
    }
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn millis(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    parsed(key, default.as_millis() as u64).map(Duration::from_millis)
}

impl Config {
    /// Reads `.env` when present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            host: parsed("HOST", defaults.host)?,
            port: parsed("PORT", defaults.port)?,
            refresh_delay: millis("REFRESH_DELAY_MS", defaults.refresh_delay)?,
            checkout_delay: millis("CHECKOUT_DELAY_MS", defaults.checkout_delay)?,
            signup_delay: millis("SIGNUP_DELAY_MS", defaults.signup_delay)?,
            session_ttl: parsed("SESSION_TTL_SECS", defaults.session_ttl.as_secs())
                .map(Duration::from_secs)?,
            log_filter: env::var("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// Zero delays, for tests.
    pub fn instant() -> Self {
        Self {
            refresh_delay: Duration::ZERO,
            checkout_delay: Duration::ZERO,
            signup_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
