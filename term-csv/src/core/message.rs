//! Validation messages: what was found, where, and how serious it is.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Level;

/// What a message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Shape of the table (header presence, row widths, encoding)
    Structure,
    /// Column naming and column-level consistency
    Schema,
    /// Syntax of individual rows and line endings
    Content,
    /// Facts about how the data was delivered
    Context,
}

impl Category {
    /// Returns the string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structure => "structure",
            Category::Schema => "schema",
            Category::Content => "content",
            Category::Context => "context",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a fault.
///
/// Each tag has a fixed [`Level`] and [`Category`]; serialized names are the
/// snake_case identifiers used in reports (e.g. `unclosed_quote`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTag {
    /// A quoted field was still open when the stream ended
    UnclosedQuote,
    /// A quote character appeared where it cannot start or end a field
    StrayQuote,
    /// Spaces or tabs directly outside the quotes of a quoted field
    Whitespace,
    /// A row in which every field is empty
    BlankRows,
    /// A line terminator differing from the declared or first-seen one
    LineBreaks,
    /// Bytes that are not valid UTF-8
    InvalidEncoding,
    /// A row whose width differs from the first row
    RaggedRows,
    /// The header repeats a column name
    DuplicateColumnName,
    /// The header has a blank column name
    EmptyColumnName,
    /// A column mixes value formats
    InconsistentValues,
    /// No header setting was given, so the first row was taken as the header
    AssumedHeader,
    /// Rows end with something other than CRLF
    NonrfcLineBreaks,
}

impl MessageTag {
    /// Returns the snake_case identifier of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageTag::UnclosedQuote => "unclosed_quote",
            MessageTag::StrayQuote => "stray_quote",
            MessageTag::Whitespace => "whitespace",
            MessageTag::BlankRows => "blank_rows",
            MessageTag::LineBreaks => "line_breaks",
            MessageTag::InvalidEncoding => "invalid_encoding",
            MessageTag::RaggedRows => "ragged_rows",
            MessageTag::DuplicateColumnName => "duplicate_column_name",
            MessageTag::EmptyColumnName => "empty_column_name",
            MessageTag::InconsistentValues => "inconsistent_values",
            MessageTag::AssumedHeader => "assumed_header",
            MessageTag::NonrfcLineBreaks => "nonrfc_line_breaks",
        }
    }

    /// The severity every message with this tag carries.
    pub fn level(&self) -> Level {
        match self {
            MessageTag::UnclosedQuote
            | MessageTag::StrayQuote
            | MessageTag::Whitespace
            | MessageTag::BlankRows
            | MessageTag::LineBreaks
            | MessageTag::InvalidEncoding => Level::Error,
            MessageTag::RaggedRows
            | MessageTag::DuplicateColumnName
            | MessageTag::EmptyColumnName
            | MessageTag::InconsistentValues => Level::Warning,
            MessageTag::AssumedHeader | MessageTag::NonrfcLineBreaks => Level::Info,
        }
    }

    /// The category every message with this tag belongs to.
    pub fn category(&self) -> Category {
        match self {
            MessageTag::UnclosedQuote
            | MessageTag::StrayQuote
            | MessageTag::Whitespace
            | MessageTag::BlankRows
            | MessageTag::LineBreaks
            | MessageTag::NonrfcLineBreaks => Category::Content,
            MessageTag::InvalidEncoding | MessageTag::RaggedRows | MessageTag::AssumedHeader => {
                Category::Structure
            }
            MessageTag::DuplicateColumnName
            | MessageTag::EmptyColumnName
            | MessageTag::InconsistentValues => Category::Schema,
        }
    }
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error, warning or info record.
///
/// `row` and `column` are 1-based. Either may be absent when the message is
/// about the stream or a whole column rather than a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The fault identifier
    pub tag: MessageTag,
    /// What the fault describes
    pub category: Category,
    /// Severity
    pub level: Level,
    /// 1-based row number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// 1-based column number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// The literal offending text, as delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    /// Creates a message for `tag` with the tag's level and category.
    pub fn new(tag: MessageTag) -> Self {
        Self {
            tag,
            category: tag.category(),
            level: tag.level(),
            row: None,
            column: None,
            content: None,
        }
    }

    /// Sets the 1-based row number.
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets the 1-based column number.
    pub fn at_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Attaches the offending content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Returns true if this message makes the stream invalid.
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.level, self.category, self.tag)?;
        match (self.row, self.column) {
            (Some(row), Some(column)) => write!(f, " at row {row}, column {column}"),
            (Some(row), None) => write!(f, " at row {row}"),
            (None, Some(column)) => write!(f, " in column {column}"),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_classification() {
        assert_eq!(MessageTag::UnclosedQuote.level(), Level::Error);
        assert_eq!(MessageTag::UnclosedQuote.category(), Category::Content);
        assert_eq!(MessageTag::DuplicateColumnName.level(), Level::Warning);
        assert_eq!(MessageTag::DuplicateColumnName.category(), Category::Schema);
        assert_eq!(MessageTag::AssumedHeader.level(), Level::Info);
        assert_eq!(MessageTag::AssumedHeader.category(), Category::Structure);
        assert_eq!(MessageTag::NonrfcLineBreaks.category(), Category::Content);
    }

    #[test]
    fn test_message_builder() {
        let msg = Message::new(MessageTag::BlankRows)
            .at_row(3)
            .with_content("\"\",\"\"\r\n");
        assert_eq!(msg.row, Some(3));
        assert_eq!(msg.column, None);
        assert!(msg.is_error());
        assert_eq!(msg.to_string(), "error [content] blank_rows at row 3");
    }

    #[test]
    fn test_message_serializes_snake_case_tag() {
        let msg = Message::new(MessageTag::InconsistentValues).at_column(2);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["tag"], "inconsistent_values");
        assert_eq!(json["category"], "schema");
        assert_eq!(json["level"], "warning");
        assert_eq!(json["column"], 2);
        assert!(json.get("row").is_none());
    }
}
