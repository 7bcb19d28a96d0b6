//! Logging utilities and configuration for term-csv.
//!
//! The validator logs through `tracing`. Per-row events are the expensive part on
//! large files, so they are gated by [`LogConfig`] rather than left to the
//! subscriber's filter alone.

use tracing::Level;

/// Logging configuration for a validation run.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for term-csv components
    pub base_level: Level,
    /// Whether to log every fault as it is recorded
    pub log_fault_details: bool,
    /// Whether to log each completed row (trace level)
    pub log_row_details: bool,
    /// Whether to log chunk submissions
    pub log_chunk_details: bool,
    /// Maximum length for logged row content
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_fault_details: true,
            log_row_details: false,
            log_chunk_details: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::TRACE,
            log_fault_details: true,
            log_row_details: true,
            log_chunk_details: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_fault_details: false,
            log_row_details: false,
            log_chunk_details: false,
            max_field_length: 128,
        }
    }

    /// Creates a balanced configuration suitable for most use cases.
    pub fn balanced() -> Self {
        Self::default()
    }
}

/// Debug logging that is skipped entirely below the configured level.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level >= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Logs a recorded fault when fault details are enabled.
#[macro_export]
macro_rules! log_fault {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_fault_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Logs a completed row when row details are enabled.
#[macro_export]
macro_rules! log_row {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_row_details {
            tracing::trace!($($arg)*);
        }
    };
}

/// Logs a chunk submission when chunk details are enabled.
#[macro_export]
macro_rules! log_chunk {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_chunk_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates a string to the maximum field length if needed.
///
/// Cuts on a character boundary so multi-byte text never splits.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Utilities for installing a `tracing` subscriber.
pub mod setup {
    use tracing::Level;

    use crate::error::{Result, TermError};

    /// Configuration for the global subscriber.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for term-csv specifically
        pub term_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                term_level: Level::INFO,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                term_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                term_level: Level::TRACE,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for term-csv.
        pub fn with_term_level(mut self, level: Level) -> Self {
            self.term_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},term_csv={}",
                    self.level.as_str().to_lowercase(),
                    self.term_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Installs a global `tracing` subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured filter. Fails if a global
    /// subscriber is already set.
    ///
    /// ```rust,no_run
    /// use term_csv::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TermError::configuration(format!("cannot install subscriber: {e}")))
    }
}
