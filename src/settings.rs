//! Diagnostics settings.
//!
//! Settings are read from an optional TOML file and may be overridden with
//! environment variables of the form `RPCDIAG__<SECTION>__<KEY>`
//! (e.g. `RPCDIAG__SINKS__CONSOLE=false`).

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::debug::{CompositeSink, ConsoleSink, DebugLog, ToolkitSink};
use crate::logging::{LogLevel, LoggingConfig};

/// Errors that can occur when loading diagnostics configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] config::ConfigError),

    /// The configuration file path is invalid.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),
}

/// Which stream the host console channel writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    Stdout,
    #[default]
    Stderr,
}

/// The `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Whether devlog messages reach the tracing output
    #[serde(default = "default_true")]
    pub devlog: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            timestamps: true,
            devlog: true,
        }
    }
}

/// The `[sinks]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SinksSection {
    /// Route diagnostics through the tracing-backed toolkit channel
    #[serde(default = "default_true")]
    pub toolkit: bool,
    /// Route diagnostics to the host console channel
    #[serde(default = "default_true")]
    pub console: bool,
    #[serde(default)]
    pub console_stream: ConsoleStream,
}

impl Default for SinksSection {
    fn default() -> Self {
        Self {
            toolkit: true,
            console: true,
            console_stream: ConsoleStream::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Root diagnostics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub sinks: SinksSection,
}

impl DiagnosticsConfig {
    /// Load configuration from a TOML file, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, the path is not valid
    /// UTF-8, or the contents cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path_str.to_string()));
        }

        let config = Config::builder()
            .add_source(File::with_name(path_str))
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load from `path` if given, otherwise from defaults and the environment.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Config::builder().add_source(Self::environment()).build()?;
                Ok(config.try_deserialize()?)
            }
        }
    }

    fn environment() -> Environment {
        Environment::with_prefix("RPCDIAG")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// The tracing subscriber settings described by `[logging]`.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::new()
            .with_level(self.logging.level)
            .with_timestamps(self.logging.timestamps)
            .with_devlog(self.logging.devlog)
    }

    /// Assembles the diagnostic sinks described by `[sinks]`.
    pub fn build_sink(&self) -> CompositeSink {
        let mut sink = CompositeSink::new();
        if self.sinks.toolkit {
            sink = sink.with_sink(ToolkitSink::new());
        }
        sink = sink.with_sink(match (self.sinks.console, self.sinks.console_stream) {
            (false, _) => ConsoleSink::absent(),
            (true, ConsoleStream::Stdout) => ConsoleSink::stdout(),
            (true, ConsoleStream::Stderr) => ConsoleSink::stderr(),
        });
        sink
    }

    /// Builds a [`DebugLog`] over [`DiagnosticsConfig::build_sink`].
    pub fn build_debug(&self) -> DebugLog {
        DebugLog::new(self.build_sink())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    fn test_defaults() {
        let config = DiagnosticsConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.timestamps);
        assert!(config.sinks.toolkit);
        assert!(config.sinks.console);
        assert_eq!(config.sinks.console_stream, ConsoleStream::Stderr);
    }

    #[test]
    fn test_load_file_not_found() {
        let result = DiagnosticsConfig::load("/nonexistent/rpcdiag.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            r#"
            [logging]
            level = "debug"
            timestamps = false
            devlog = false

            [sinks]
            toolkit = false
            console = true
            console_stream = "stdout"
            "#,
        );

        let config = DiagnosticsConfig::load(file.path()).expect("Failed to load config");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.logging.timestamps);
        assert!(!config.logging.devlog);
        assert!(!config.sinks.toolkit);
        assert_eq!(config.sinks.console_stream, ConsoleStream::Stdout);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [sinks]
            console = false
            "#,
        );

        let config = DiagnosticsConfig::load(file.path()).expect("Failed to load config");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.sinks.toolkit);
        assert!(!config.sinks.console);
    }

    #[test]
    fn test_load_invalid_level() {
        let file = write_config(
            r#"
            [logging]
            level = "loud"
            "#,
        );

        let result = DiagnosticsConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_build_sink_respects_flags() {
        let mut config = DiagnosticsConfig::default();
        assert_eq!(config.build_sink().len(), 2);

        config.sinks.toolkit = false;
        config.sinks.console = false;
        // The console slot stays, absent.
        assert_eq!(config.build_sink().len(), 1);
    }

    #[test]
    fn test_logging_config_mapping() {
        let mut config = DiagnosticsConfig::default();
        config.logging.level = LogLevel::Trace;
        config.logging.devlog = false;

        let logging = config.logging_config();
        assert_eq!(logging.level, LogLevel::Trace);
        assert!(!logging.show_devlog);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::FileNotFound("missing.toml".to_string());
        assert_eq!(err.to_string(), "configuration file not found: missing.toml");
    }
}
