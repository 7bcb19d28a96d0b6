//! Message severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a validation message.
///
/// Levels are ordered by severity: Error > Warning > Info. Only errors
/// make a stream invalid.
///
/// - **Error**: the data breaks the format (unclosed or stray quotes, blank rows,
///   unexpected line breaks)
/// - **Warning**: the data is readable but suspicious (duplicate or empty column
///   names, columns mixing value formats)
/// - **Info**: observations about how the data was interpreted (an assumed header,
///   non-CRLF line endings)
///
/// # Examples
///
/// ```rust
/// use term_csv::core::Level;
///
/// assert!(Level::Error > Level::Warning);
/// assert!(Level::Warning > Level::Info);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Advisory only
    Info = 0,
    /// Style or schema concern that does not affect validity
    #[default]
    Warning = 1,
    /// Makes the stream invalid
    Error = 2,
}

impl Level {
    /// Returns the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }

    /// Checks if this level is at least as severe as another level.
    ///
    /// ```rust
    /// use term_csv::core::Level;
    ///
    /// assert!(Level::Error.is_at_least(Level::Warning));
    /// assert!(!Level::Info.is_at_least(Level::Error));
    /// ```
    pub fn is_at_least(&self, other: Level) -> bool {
        *self >= other
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error > Level::Warning);
        assert!(Level::Warning > Level::Info);
        assert!(Level::Error.is_at_least(Level::Error));
        assert!(!Level::Warning.is_at_least(Level::Error));
    }

    #[test]
    fn test_level_serde() {
        let json = serde_json::to_string(&Level::Error).unwrap();
        assert_eq!(json, "\"error\"");

        let level: Level = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(level, Level::Info);
    }
}
