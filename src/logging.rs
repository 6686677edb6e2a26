//! Logging setup for applications that build bulk payloads.
//!
//! The request builders emit `tracing` events: `debug` when a request is
//! rendered, `trace` when cached lines are reused and `warn` when a document
//! cannot be encoded. This module installs a subscriber for those events.
//! Defaults to JSON output on STDERR at INFO level.
//!
//! # Examples
//!
//! ```no_run
//! use bulkwire::logging::*;
//!
//! LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Compact)
//!     .init()
//!     .expect("logging already initialized");
//!
//! info!("Bulk writer started");
//! ```
//!
//! Environment variables read by [`LogConfig::from_env`]:
//!
//! - `BULKWIRE_LOG_LEVEL=trace|debug|info|warn|error`
//! - `BULKWIRE_LOG_FORMAT=json|plain|pretty|compact`
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

use std::{env, io, str::FromStr};
use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter, Layer, Registry,
};

pub use tracing::{debug, error, info, trace, warn};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Cache hits and every rendered request
    Trace,
    /// Rendered request sizes
    Debug,
    /// General information
    Info,
    /// Encoding failures
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Directive string for `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LogInitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(LogInitError::UnknownLevel(other.to_string())),
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines (default)
    Json,
    /// Plain single-line text
    Plain,
    /// Multi-line, human-friendly
    Pretty,
    /// Abbreviated single-line text
    Compact,
}

impl FromStr for LogFormat {
    type Err = LogInitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "plain" => Ok(LogFormat::Plain),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(LogInitError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors raised while configuring logging.
#[derive(Debug, Error)]
pub enum LogInitError {
    /// Unrecognized level name.
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// Unrecognized format name.
    #[error("Unknown log format: {0}")]
    UnknownFormat(String),

    /// The custom filter directive did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Logging configuration
///
/// ```
/// use bulkwire::logging::*;
///
/// let config = LogConfig::new()
///     .level(LogLevel::Debug)
///     .format(LogFormat::Pretty)
///     .with_thread_ids(true)
///     .with_env_filter("bulkwire_core=trace");
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Include target (module path)
    pub targets: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Enable ANSI colors
    pub colors: bool,
    /// Custom filter directives (overrides level if set)
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            targets: true,
            thread_ids: false,
            colors: false,
            env_filter: None,
        }
    }
}

impl LogConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `BULKWIRE_LOG_LEVEL` and `BULKWIRE_LOG_FORMAT` over the defaults
    pub fn from_env() -> Result<Self, LogInitError> {
        let mut config = Self::default();
        if let Ok(level) = env::var("BULKWIRE_LOG_LEVEL") {
            config.level = level.parse()?;
        }
        if let Ok(format) = env::var("BULKWIRE_LOG_FORMAT") {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    /// Set log level
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set output format
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable target (module path)
    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    /// Enable or disable thread IDs
    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    /// Enable or disable ANSI colors
    pub fn with_colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Set custom filter directives, e.g. `"bulkwire_core=trace,info"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Build the filter: custom directives, then `RUST_LOG`, then the level.
    pub fn filter(&self) -> Result<EnvFilter, LogInitError> {
        match &self.env_filter {
            Some(directives) => Ok(EnvFilter::try_new(directives)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))),
        }
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_writer(io::stderr)
            .with_target(self.targets)
            .with_thread_ids(self.thread_ids);

        match self.format {
            LogFormat::Json => base.json().boxed(),
            LogFormat::Plain => base.with_ansi(self.colors).boxed(),
            LogFormat::Pretty => base.pretty().with_ansi(self.colors).boxed(),
            LogFormat::Compact => base.compact().with_ansi(self.colors).boxed(),
        }
    }

    /// Install the global subscriber.
    ///
    /// Fails if a subscriber is already installed.
    pub fn init(self) -> Result<(), LogInitError> {
        let filter = self.filter()?;
        tracing_subscriber::registry()
            .with(self.layer())
            .with(filter)
            .try_init()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(LogInitError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.targets);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .level(LogLevel::Trace)
            .format(LogFormat::Pretty)
            .with_colors(true)
            .with_targets(false);

        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.colors);
        assert!(!config.targets);
    }

    #[test]
    fn test_custom_filter() {
        let config = LogConfig::new().with_env_filter("bulkwire_core=trace,info");
        assert!(config.filter().is_ok());

        let config = LogConfig::new().with_env_filter("bulkwire_core=[");
        assert!(matches!(config.filter(), Err(LogInitError::Filter(_))));
    }

    #[test]
    fn test_init_twice_fails() {
        // Only test in this binary that installs a global subscriber.
        LogConfig::new().level(LogLevel::Error).init().unwrap();
        let second = LogConfig::new().level(LogLevel::Error).init();
        assert!(matches!(second, Err(LogInitError::AlreadyInitialized(_))));
    }
}
