//! CSV dialect: the syntactic conventions of one validation run.
//!
//! A [`Dialect`] can be built in code or read from a
//! [CSV on the Web](https://www.w3.org/TR/tabular-metadata/#dialect-descriptions)
//! dialect description:
//!
//! ```rust
//! use term_csv::dialect::{Dialect, Terminator};
//!
//! let dialect = Dialect::from_json(r#"{"delimiter": ";", "lineTerminator": "\n", "header": false}"#)?;
//! assert_eq!(dialect.delimiter, ';');
//! assert_eq!(dialect.line_terminator, Some(Terminator::Lf));
//! assert_eq!(dialect.header, Some(false));
//! # Ok::<(), term_csv::error::TermError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TermError};

/// A row terminator sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Terminator {
    /// `\r\n`, the RFC 4180 terminator
    CrLf,
    /// `\n`
    Lf,
    /// `\r`
    Cr,
}

impl Terminator {
    /// The literal characters of the terminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminator::CrLf => "\r\n",
            Terminator::Lf => "\n",
            Terminator::Cr => "\r",
        }
    }

    /// Escaped form suitable for messages and logs.
    pub fn escaped(&self) -> &'static str {
        match self {
            Terminator::CrLf => "\\r\\n",
            Terminator::Lf => "\\n",
            Terminator::Cr => "\\r",
        }
    }

    /// Returns true for CRLF.
    pub fn is_rfc4180(&self) -> bool {
        matches!(self, Terminator::CrLf)
    }

    /// Parses a terminator from its literal characters.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "\r\n" => Ok(Terminator::CrLf),
            "\n" => Ok(Terminator::Lf),
            "\r" => Ok(Terminator::Cr),
            other => Err(TermError::configuration(format!(
                "unsupported line terminator {other:?}; expected \"\\r\\n\", \"\\n\" or \"\\r\""
            ))),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.escaped())
    }
}

impl TryFrom<String> for Terminator {
    type Error = TermError;

    fn try_from(value: String) -> Result<Self> {
        Terminator::parse(&value)
    }
}

impl From<Terminator> for String {
    fn from(value: Terminator) -> Self {
        value.as_str().to_string()
    }
}

/// Read-only syntactic options for one validation run.
///
/// Field names follow the CSVW dialect vocabulary when (de)serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dialect {
    /// Field separator (default `,`)
    pub delimiter: char,
    /// Quote character (default `"`)
    pub quote_char: char,
    /// Whether the first row is a header; `None` means "not stated"
    pub header: Option<bool>,
    /// The terminator rows are expected to end with, if declared
    pub line_terminator: Option<Terminator>,
    /// Silently skip rows whose fields are all empty
    pub skip_blank_rows: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            header: None,
            line_terminator: None,
            skip_blank_rows: false,
        }
    }
}

impl Dialect {
    /// Creates the default dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a CSVW dialect description and validates it.
    ///
    /// Keys outside the supported set are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let dialect: Dialect = serde_json::from_str(json)?;
        dialect.validate()?;
        Ok(dialect)
    }

    /// Sets the field separator.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    pub fn with_quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// States whether the first row is a header.
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = Some(header);
        self
    }

    /// Declares the expected line terminator.
    pub fn with_line_terminator(mut self, terminator: Terminator) -> Self {
        self.line_terminator = Some(terminator);
        self
    }

    /// Enables or disables skipping of blank rows.
    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }

    /// Checks that the delimiter and quote character can be told apart from each
    /// other and from line breaks.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.quote_char {
            return Err(TermError::configuration(format!(
                "delimiter and quote character are both {:?}",
                self.delimiter
            )));
        }
        for (name, c) in [("delimiter", self.delimiter), ("quote character", self.quote_char)] {
            if c == '\r' || c == '\n' {
                return Err(TermError::configuration(format!(
                    "{name} cannot be a line break ({c:?})"
                )));
            }
        }
        Ok(())
    }
}
