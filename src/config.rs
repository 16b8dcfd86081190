//! Configuration Module
//!
//! Handles loading worker and ingress configuration from environment variables.
//! Everything is read once at startup.

use std::env;
use std::time::Duration;

/// Default bus endpoint
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
/// Default subject the worker listens on
pub const DEFAULT_REQUEST_SUBJECT: &str = "hash_requests";
/// Queue group shared by all cooperating worker processes
pub const DEFAULT_QUEUE_GROUP: &str = "workers";
/// Default cache TTL in seconds
pub const DEFAULT_CACHE_TTL: u64 = 300;

// == Log Level ==
/// Verbosity toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Normal,
    Debug,
}

impl LogLevel {
    /// Anything other than `debug` means normal verbosity.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("debug") {
            LogLevel::Debug
        } else {
            LogLevel::Normal
        }
    }

    /// Default `EnvFilter` directive for the given crate.
    pub fn filter_directive(&self, target: &str) -> String {
        match self {
            LogLevel::Normal => format!("{}=info", target),
            LogLevel::Debug => format!("{}=debug", target),
        }
    }
}

/// Worker configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bus endpoint URL
    pub nats_url: String,
    /// Optional bus username
    pub nats_user: Option<String>,
    /// Optional bus password
    pub nats_password: Option<String>,
    /// Subject carrying digest requests
    pub request_subject: String,
    /// Queue group name for competing consumers
    pub queue_group: String,
    /// Cache TTL in seconds
    pub cache_ttl: u64,
    /// Seconds between expired-entry sweeps, 0 = disabled
    pub sweep_interval: u64,
    /// Verbosity
    pub log_level: LogLevel,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NATS_URL` - Bus endpoint (default: nats://localhost:4222)
    /// - `NATS_USER` / `NATS_PASSWORD` - Credentials (default: unset)
    /// - `REQUEST_SUBJECT` - Subscription subject (default: hash_requests)
    /// - `QUEUE_GROUP` - Queue group (default: workers)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep interval in seconds (default: 0, disabled)
    /// - `LOG_LEVEL` - `normal` or `debug` (default: normal)
    pub fn from_env() -> Self {
        Self {
            nats_url: env::var("NATS_URL").unwrap_or_else(|_| DEFAULT_NATS_URL.to_string()),
            nats_user: non_empty_var("NATS_USER"),
            nats_password: non_empty_var("NATS_PASSWORD"),
            request_subject: env::var("REQUEST_SUBJECT")
                .unwrap_or_else(|_| DEFAULT_REQUEST_SUBJECT.to_string()),
            queue_group: env::var("QUEUE_GROUP")
                .unwrap_or_else(|_| DEFAULT_QUEUE_GROUP.to_string()),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            log_level: env::var("LOG_LEVEL")
                .map(|v| LogLevel::parse(&v))
                .unwrap_or_default(),
        }
    }

    /// Username and password, only when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.nats_user, &self.nats_password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nats_url: DEFAULT_NATS_URL.to_string(),
            nats_user: None,
            nats_password: None,
            request_subject: DEFAULT_REQUEST_SUBJECT.to_string(),
            queue_group: DEFAULT_QUEUE_GROUP.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            sweep_interval: 0,
            log_level: LogLevel::Normal,
        }
    }
}

// == Ingress Config ==
/// Configuration for the HTTP ingress binary.
#[derive(Debug, Clone)]
pub struct IngressConfig {
    pub nats_url: String,
    pub nats_user: Option<String>,
    pub nats_password: Option<String>,
    /// HTTP server port
    pub port: u16,
    /// Subject inbound bodies are published on
    pub subject: String,
    pub log_level: LogLevel,
}

impl IngressConfig {
    /// # Environment Variables
    /// - `NATS_URL`, `NATS_USER`, `NATS_PASSWORD`, `LOG_LEVEL` - as for the worker
    /// - `INGRESS_PORT` - HTTP port (default: 5000)
    /// - `INGRESS_SUBJECT` - Publish subject (default: hello.world)
    pub fn from_env() -> Self {
        Self {
            nats_url: env::var("NATS_URL").unwrap_or_else(|_| DEFAULT_NATS_URL.to_string()),
            nats_user: non_empty_var("NATS_USER"),
            nats_password: non_empty_var("NATS_PASSWORD"),
            port: env::var("INGRESS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            subject: env::var("INGRESS_SUBJECT").unwrap_or_else(|_| "hello.world".to_string()),
            log_level: env::var("LOG_LEVEL")
                .map(|v| LogLevel::parse(&v))
                .unwrap_or_default(),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.nats_user, &self.nats_password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            nats_url: DEFAULT_NATS_URL.to_string(),
            nats_user: None,
            nats_password: None,
            port: 5000,
            subject: "hello.world".to_string(),
            log_level: LogLevel::Normal,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
