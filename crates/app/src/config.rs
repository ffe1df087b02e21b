//! Application configuration loaded from environment variables.

use std::str::FromStr;

use background::{BackgroundQueue, QueueWorker};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Runtime configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `QUEUE_CAPACITY`: background queue capacity, `0` for unbounded (default: `256`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub queue_capacity: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`. Unparseable values fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse().unwrap_or_else(|error: String| {
                tracing::warn!(%error, "ignoring LOG_FORMAT");
                defaults.log_format
            }),
            None => defaults.log_format,
        };

        let queue_capacity = match lookup("QUEUE_CAPACITY") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "ignoring QUEUE_CAPACITY");
                defaults.queue_capacity
            }),
            None => defaults.queue_capacity,
        };

        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
            queue_capacity,
        }
    }

    /// Builds the background queue described by `queue_capacity`.
    pub fn background_queue(&self) -> (BackgroundQueue, QueueWorker) {
        match self.queue_capacity {
            0 => BackgroundQueue::unbounded(),
            capacity => BackgroundQueue::bounded(capacity),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            queue_capacity: 256,
        }
    }
}
