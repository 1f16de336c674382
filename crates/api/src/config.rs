//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// A variable was set but could not be parsed.
#[derive(Debug, Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables (after an optional `.env` file):
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `5000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `DATABASE_URL`: PostgreSQL URL; unset runs on the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `PAYMENT_DECLINE_RATE`: simulator decline probability (default: `0.05`)
/// - `DISPATCH_QUEUE_CAPACITY`: notification queue size (default: `1024`)
/// - `REPORT_INTERVAL_SECS`: scheduled job period (default: `86400`)
/// - `FRONTEND_URL`: allowed CORS origin; unset allows any
/// - `SMS_SIGNATURE`: text appended to outgoing SMS (default: `"As-Shawkani Fdn."`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub payment_decline_rate: f64,
    pub dispatch_queue_capacity: usize,
    pub report_interval: Duration,
    pub frontend_url: Option<String>,
    pub sms_signature: String,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { name, value }),
        None => Ok(default),
    }
}

/// Seconds from `name`, which must be at least one.
fn interval(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    non_zero_secs(name, parsed(name, default.as_secs())?)
}

fn non_zero_secs(name: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError {
            name,
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port)?,
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: parsed("LOG_FORMAT", defaults.log_format)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parsed(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            payment_decline_rate: parsed("PAYMENT_DECLINE_RATE", defaults.payment_decline_rate)?,
            dispatch_queue_capacity: parsed(
                "DISPATCH_QUEUE_CAPACITY",
                defaults.dispatch_queue_capacity,
            )?,
            report_interval: interval("REPORT_INTERVAL_SECS", defaults.report_interval)?,
            frontend_url: var("FRONTEND_URL"),
            sms_signature: var("SMS_SIGNATURE").unwrap_or(defaults.sms_signature),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            database_url: None,
            database_max_connections: 5,
            payment_decline_rate: workflow::DEFAULT_DECLINE_RATE,
            dispatch_queue_capacity: workflow::DEFAULT_QUEUE_CAPACITY,
            report_interval: reporting::DEFAULT_REPORT_INTERVAL,
            frontend_url: None,
            sms_signature: "As-Shawkani Fdn.".to_string(),
        }
    }
}
