//! Tracing subscriber setup.
//!
//! The toolkit diagnostic channel ([`crate::debug::ToolkitSink`]) emits
//! `tracing` events; this module installs the subscriber that renders them.
//! Output goes to stderr so stdout stays free for command results.

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Disable logging entirely
    Off,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    /// Rank from quietest (`Off`) to most verbose (`Trace`).
    fn verbosity(self) -> u8 {
        match self {
            LogLevel::Off => 0,
            LogLevel::Error => 1,
            LogLevel::Warn => 2,
            LogLevel::Info => 3,
            LogLevel::Debug => 4,
            LogLevel::Trace => 5,
        }
    }
}

impl From<u8> for LogLevel {
    /// Convert verbosity count to log level.
    /// 0 = Info, 1 = Debug, 2+ = Trace
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub with_timestamps: bool,
    /// Whether to include the target, which separates
    /// `rpcdiag::diagnostics` from `rpcdiag::devlog` output
    pub with_target: bool,
    pub with_thread_ids: bool,
    /// Whether `rpcdiag::devlog` events are shown at all
    pub show_devlog: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamps: true,
            with_target: true,
            with_thread_ids: false,
            show_devlog: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    pub fn with_devlog(mut self, enabled: bool) -> Self {
        self.show_devlog = enabled;
        self
    }

    /// Applies a `-v` count on top of the configured level.
    ///
    /// The level only ever becomes more verbose; a count of zero keeps it.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        let requested = LogLevel::from(verbosity);
        if verbosity > 0 && requested.verbosity() > self.level.verbosity() {
            self.level = requested;
        }
        self
    }

    /// Builds the filter directive string, ignoring `RUST_LOG`.
    pub fn filter_directives(&self) -> String {
        let mut directives = self.level.directive().to_string();
        if !self.show_devlog {
            directives.push_str(",rpcdiag::devlog=off");
        }
        directives
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
///
/// # Examples
///
/// ```no_run
/// use rpcdiag::logging::{try_init_logging, LoggingConfig, LogLevel};
///
/// try_init_logging(LoggingConfig::new().with_level(LogLevel::Debug))?;
/// # Ok::<(), rpcdiag::logging::LoggingError>(())
/// ```
pub fn try_init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.filter_directives())
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids);

    let result = if config.with_timestamps {
        subscriber.try_init()
    } else {
        subscriber.without_time().try_init()
    };

    result.map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}

/// Installs the global subscriber, ignoring an already installed one.
pub fn init_logging(config: LoggingConfig) {
    if let Err(err) = try_init_logging(config) {
        tracing::debug!("{}", err);
    }
}
