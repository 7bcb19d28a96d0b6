//! Error types for the term-csv validation library.
//!
//! Problems found *in the data* are never returned as errors: the validator records
//! them as [`Message`](crate::core::Message)s and keeps going. `TermError` is reserved
//! for problems with the setup around a validation run, such as an unusable dialect,
//! an unreadable source or a malformed dialect document.

use thiserror::Error;

/// The main error type for the term-csv library.
#[derive(Error, Debug)]
pub enum TermError {
    /// The dialect or validator configuration cannot be used.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from a data source feeding the validator.
    #[error("Data source error: {message}")]
    DataSource {
        /// Type of data source (e.g., "file", "reader")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, TermError>`.
pub type Result<T> = std::result::Result<T, TermError>;

impl TermError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

impl From<serde_json::Error> for TermError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
