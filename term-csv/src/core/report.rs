//! Validation report types.

use serde::{Deserialize, Serialize};

use super::{Level, Message, MessageTag};
use crate::error::Result;
use crate::header::HeaderDecision;
use crate::profiler::ColumnProfile;

/// A snapshot of a validator's findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no error-level message was recorded
    pub valid: bool,
    /// Number of rows processed
    pub row_count: usize,
    /// Whether a row limit cut the stream short
    pub truncated: bool,
    /// Header decision at the time of the snapshot
    pub header: HeaderDecision,
    /// Error-level messages, in the order they were found
    pub errors: Vec<Message>,
    /// Warning-level messages, in the order they were found
    pub warnings: Vec<Message>,
    /// Info-level messages, in the order they were found
    pub info_messages: Vec<Message>,
    /// Value format histogram per column, indexed by 0-based column
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_profiles: Vec<ColumnProfile>,
}

impl ValidationReport {
    /// Returns true if there are any error-level messages.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if there are any warning-level messages.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Gets all messages of a specific level.
    pub fn messages_by_level(&self, level: Level) -> &[Message] {
        match level {
            Level::Error => &self.errors,
            Level::Warning => &self.warnings,
            Level::Info => &self.info_messages,
        }
    }

    /// Gets all messages carrying `tag`.
    pub fn messages_by_tag(&self, tag: MessageTag) -> Vec<&Message> {
        self.messages_by_level(tag.level())
            .iter()
            .filter(|msg| msg.tag == tag)
            .collect()
    }

    /// Formats the report as JSON.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use term_csv::validator::StreamingValidator;
    ///
    /// let mut validator = StreamingValidator::new();
    /// validator.submit_chunk("a,b\r\n1,2\r\n");
    /// validator.finalize();
    ///
    /// let json = validator.report().to_json().unwrap();
    /// assert!(json.contains("\"valid\":true"));
    /// ```
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Formats the report as JSON with pretty printing.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
