//! Quote-aware row and field tokenizer that is safe across chunk boundaries.
//!
//! The tokenizer is a character-level state machine. Every piece of state needed
//! to resume (the open field, the fields of the current row, whether a quote is
//! open, whether a `\r` is waiting to see if a `\n` follows) lives in the
//! [`Tokenizer`] itself, so feeding a stream in one chunk or in a thousand yields
//! exactly the same rows.
//!
//! Structural faults are classified as they are found and attached to the row as a
//! [`RowFault`]. A row keeps only its most specific fault.
//!
//! ```rust
//! use term_csv::dialect::{Dialect, Terminator};
//! use term_csv::tokenizer::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::new(&Dialect::default());
//! assert!(tokenizer.feed("name,\"quo").is_empty());
//! let rows = tokenizer.feed("ted\"\r\n1,2");
//! assert_eq!(rows[0].fields, vec!["name", "quoted"]);
//! assert_eq!(rows[0].terminator, Some(Terminator::CrLf));
//!
//! let rest = tokenizer.finish();
//! assert_eq!(rest[0].fields, vec!["1", "2"]);
//! assert_eq!(rest[0].terminator, None);
//! ```

use crate::core::MessageTag;
use crate::dialect::{Dialect, Terminator};

/// A structural fault found while tokenizing a row.
///
/// Variants are ordered by specificity; when a row has several, the greatest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowFault {
    /// Whitespace directly outside a quoted field
    Whitespace,
    /// A quote that neither opens nor closes a field
    StrayQuote,
    /// The stream ended inside a quoted field
    UnclosedQuote,
}

impl RowFault {
    /// The message tag reported for this fault.
    pub fn tag(self) -> MessageTag {
        match self {
            RowFault::Whitespace => MessageTag::Whitespace,
            RowFault::StrayQuote => MessageTag::StrayQuote,
            RowFault::UnclosedQuote => MessageTag::UnclosedQuote,
        }
    }
}

/// A field value and its 0-based column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// 0-based index within the row
    pub column: usize,
    /// Unquoted value
    pub value: &'a str,
}

/// One logical row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based row number within the stream
    pub number: usize,
    /// Field values with quoting removed
    pub fields: Vec<String>,
    /// The literal text of the row as delivered, terminator included
    pub raw: String,
    /// The terminator that ended the row; `None` for a final unterminated row
    pub terminator: Option<Terminator>,
    /// The most specific structural fault found in the row
    pub fault: Option<RowFault>,
}

impl Row {
    /// Creates a well-formed row from field values.
    pub fn new<S: Into<String>>(number: usize, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            number,
            fields: fields.into_iter().map(Into::into).collect(),
            raw: String::new(),
            terminator: None,
            fault: None,
        }
    }

    /// Number of fields.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if every field is empty.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(String::is_empty)
    }

    /// Iterates the fields with their column indices.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> {
        self.fields
            .iter()
            .enumerate()
            .map(|(column, value)| Field {
                column,
                value: value.as_str(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing of the current field consumed except, possibly, leading whitespace
    FieldStart,
    /// Inside an unquoted field
    Unquoted,
    /// Just read a quote inside an unquoted field
    UnquotedQuote,
    /// Inside a quoted field
    Quoted,
    /// Just read a quote inside a quoted field: a doubled quote or the closing one
    QuoteInQuoted,
    /// After a closing quote and at least one space or tab
    AfterClose,
}

/// Incremental CSV tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    delimiter: char,
    quote: char,
    state: State,
    fields: Vec<String>,
    field: String,
    leading_ws: String,
    raw: String,
    fault: Option<RowFault>,
    pending_cr: bool,
    rows_emitted: usize,
}

impl Tokenizer {
    /// Creates a tokenizer for the delimiter and quote character of `dialect`.
    pub fn new(dialect: &Dialect) -> Self {
        Self {
            delimiter: dialect.delimiter,
            quote: dialect.quote_char,
            state: State::FieldStart,
            fields: Vec::new(),
            field: String::new(),
            leading_ws: String::new(),
            raw: String::new(),
            fault: None,
            pending_cr: false,
            rows_emitted: 0,
        }
    }

    /// Consumes a chunk and returns the rows it completes.
    pub fn feed(&mut self, chunk: &str) -> Vec<Row> {
        let mut rows = Vec::new();
        for c in chunk.chars() {
            self.step(c, &mut rows);
        }
        rows
    }

    /// Ends the stream and returns the final partial row, if any.
    ///
    /// A quoted field still open at this point is discarded and the row is marked
    /// with [`RowFault::UnclosedQuote`].
    pub fn finish(&mut self) -> Vec<Row> {
        let mut rows = Vec::new();
        if self.pending_cr {
            self.pending_cr = false;
            self.emit(Some(Terminator::Cr), &mut rows);
        }
        match self.state {
            State::FieldStart => {
                if !self.raw.is_empty() {
                    self.field = std::mem::take(&mut self.leading_ws);
                    self.end_field();
                    self.emit(None, &mut rows);
                }
            }
            State::Quoted => {
                self.flag(RowFault::UnclosedQuote);
                self.field.clear();
                self.emit(None, &mut rows);
            }
            State::Unquoted | State::UnquotedQuote | State::QuoteInQuoted | State::AfterClose => {
                self.end_field();
                self.emit(None, &mut rows);
            }
        }
        rows
    }

    /// Returns true when no partial row is buffered.
    pub fn at_row_boundary(&self) -> bool {
        self.raw.is_empty() && !self.pending_cr
    }

    /// Bytes of the partial row currently buffered.
    pub fn pending_len(&self) -> usize {
        self.raw.len()
    }

    /// Number of rows produced so far.
    pub fn rows_emitted(&self) -> usize {
        self.rows_emitted
    }

    /// 1-based number of the row the next character belongs to.
    ///
    /// A row ended by `\r` is held back until the following character shows
    /// whether a `\n` completes the terminator; it is counted here already.
    pub fn current_row(&self) -> usize {
        self.rows_emitted + 1 + usize::from(self.pending_cr)
    }

    fn step(&mut self, c: char, rows: &mut Vec<Row>) {
        if self.pending_cr {
            self.pending_cr = false;
            if c == '\n' {
                self.raw.push(c);
                self.emit(Some(Terminator::CrLf), rows);
                return;
            }
            self.emit(Some(Terminator::Cr), rows);
        }
        self.raw.push(c);

        match self.state {
            State::FieldStart => {
                if c == self.delimiter {
                    self.field = std::mem::take(&mut self.leading_ws);
                    self.end_field();
                } else if c == self.quote {
                    if !self.leading_ws.is_empty() {
                        self.flag(RowFault::Whitespace);
                        self.leading_ws.clear();
                    }
                    self.state = State::Quoted;
                } else if c == '\r' || c == '\n' {
                    self.field = std::mem::take(&mut self.leading_ws);
                    self.end_row(c, rows);
                } else if c == ' ' || c == '\t' {
                    self.leading_ws.push(c);
                } else {
                    self.field = std::mem::take(&mut self.leading_ws);
                    self.field.push(c);
                    self.state = State::Unquoted;
                }
            }
            State::Unquoted => self.unquoted(c, rows),
            State::UnquotedQuote => {
                // A quote inside an unquoted field is tolerated only right before a
                // delimiter or a line break.
                if c != self.delimiter && c != '\r' && c != '\n' {
                    self.flag(RowFault::StrayQuote);
                }
                self.unquoted(c, rows);
            }
            State::Quoted => {
                if c == self.quote {
                    self.state = State::QuoteInQuoted;
                } else {
                    self.field.push(c);
                }
            }
            State::QuoteInQuoted => {
                if c == self.quote {
                    self.field.push(c);
                    self.state = State::Quoted;
                } else if c == self.delimiter {
                    self.end_field();
                } else if c == '\r' || c == '\n' {
                    self.end_row(c, rows);
                } else if c == ' ' || c == '\t' {
                    self.flag(RowFault::Whitespace);
                    self.state = State::AfterClose;
                } else {
                    self.flag(RowFault::StrayQuote);
                    self.field.push(self.quote);
                    self.field.push(c);
                    self.state = State::Unquoted;
                }
            }
            State::AfterClose => {
                if c == self.delimiter {
                    self.end_field();
                } else if c == '\r' || c == '\n' {
                    self.end_row(c, rows);
                } else if c != ' ' && c != '\t' {
                    self.flag(RowFault::StrayQuote);
                    self.unquoted(c, rows);
                }
            }
        }
    }

    fn unquoted(&mut self, c: char, rows: &mut Vec<Row>) {
        if c == self.delimiter {
            self.end_field();
        } else if c == '\r' || c == '\n' {
            self.end_row(c, rows);
        } else if c == self.quote {
            self.field.push(c);
            self.state = State::UnquotedQuote;
        } else {
            self.field.push(c);
            self.state = State::Unquoted;
        }
    }

    fn flag(&mut self, fault: RowFault) {
        self.fault = self.fault.max(Some(fault));
    }

    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
        self.state = State::FieldStart;
    }

    fn end_row(&mut self, c: char, rows: &mut Vec<Row>) {
        self.end_field();
        if c == '\r' {
            self.pending_cr = true;
        } else {
            self.emit(Some(Terminator::Lf), rows);
        }
    }

    fn emit(&mut self, terminator: Option<Terminator>, rows: &mut Vec<Row>) {
        self.rows_emitted += 1;
        rows.push(Row {
            number: self.rows_emitted,
            fields: std::mem::take(&mut self.fields),
            raw: std::mem::take(&mut self.raw),
            terminator,
            fault: self.fault.take(),
        });
        self.state = State::FieldStart;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(chunks: &[&str]) -> Vec<Row> {
        let mut tokenizer = Tokenizer::new(&Dialect::default());
        let mut rows = Vec::new();
        for chunk in chunks {
            rows.extend(tokenizer.feed(chunk));
        }
        rows.extend(tokenizer.finish());
        rows
    }

    #[test]
    fn test_simple_rows() {
        let rows = tokenize(&["a,b,c\r\n1,2,3\r\n"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["a", "b", "c"]);
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].raw, "1,2,3\r\n");
        assert!(rows.iter().all(|r| r.fault.is_none()));
    }

    #[test]
    fn test_quoted_fields_keep_delimiters_newlines_and_doubled_quotes() {
        let rows = tokenize(&["\"a,b\",\"line\nbreak\",\"say \"\"hi\"\"\"\n"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields, vec!["a,b", "line\nbreak", "say \"hi\""]);
        assert_eq!(rows[0].terminator, Some(Terminator::Lf));
        assert_eq!(rows[0].fault, None);
    }

    #[test]
    fn test_cr_split_from_lf_across_chunks() {
        let rows = tokenize(&["a,b\r", "\nc,d\r", "e,f"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].terminator, Some(Terminator::CrLf));
        assert_eq!(rows[0].raw, "a,b\r\n");
        assert_eq!(rows[1].terminator, Some(Terminator::Cr));
        assert_eq!(rows[2].fields, vec!["e", "f"]);
        assert_eq!(rows[2].terminator, None);
    }

    #[test]
    fn test_trailing_cr_at_end_of_stream() {
        let rows = tokenize(&["a\r"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].terminator, Some(Terminator::Cr));
    }

    #[test]
    fn test_quote_split_across_chunks() {
        let rows = tokenize(&["\"a\"", "\"b\",c\n"]);
        assert_eq!(rows[0].fields, vec!["a\"b", "c"]);
        assert_eq!(rows[0].fault, None);
    }

    #[test]
    fn test_unclosed_quote_discards_open_field() {
        let rows = tokenize(&["x,\"abc\ndef"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fault, Some(RowFault::UnclosedQuote));
        assert_eq!(rows[0].fields, vec!["x"]);
        assert_eq!(rows[0].raw, "x,\"abc\ndef");
    }

    #[test]
    fn test_stray_quote_inside_quoted_field_recovers_at_row_end() {
        let rows = tokenize(&["\"a\"b,c\r\nd,e\r\n"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fault, Some(RowFault::StrayQuote));
        assert_eq!(rows[0].fields, vec!["a\"b", "c"]);
        assert_eq!(rows[1].fault, None);
    }

    #[test]
    fn test_quote_inside_unquoted_field() {
        let stray = tokenize(&["ab\"c,d\n"]);
        assert_eq!(stray[0].fault, Some(RowFault::StrayQuote));

        let adjacent = tokenize(&["1\",2\"\n"]);
        assert_eq!(adjacent[0].fault, None);
        assert_eq!(adjacent[0].fields, vec!["1\"", "2\""]);
    }

    #[test]
    fn test_whitespace_around_quotes_flagged_once() {
        let rows = tokenize(&[" \"a\" , \"b\"\n"]);
        assert_eq!(rows[0].fault, Some(RowFault::Whitespace));
        assert_eq!(rows[0].fields, vec!["a", "b"]);

        let inside = tokenize(&["\"  a  \",b\n"]);
        assert_eq!(inside[0].fault, None);
        assert_eq!(inside[0].fields[0], "  a  ");

        let unquoted = tokenize(&[" a , b \n"]);
        assert_eq!(unquoted[0].fault, None);
        assert_eq!(unquoted[0].fields, vec![" a ", " b "]);
    }

    #[test]
    fn test_stray_outranks_whitespace() {
        let rows = tokenize(&["\"a\" x,b\n"]);
        assert_eq!(rows[0].fault, Some(RowFault::StrayQuote));
    }

    #[test]
    fn test_blank_rows() {
        let rows = tokenize(&["\"\",\"\",\"\"\r\n\r\n,\n"]);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(Row::is_blank));
        assert_eq!(rows[1].fields, vec![""]);
        assert_eq!(rows[2].fields, vec!["", ""]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_last_field() {
        let rows = tokenize(&["a,b,"]);
        assert_eq!(rows[0].fields, vec!["a", "b", ""]);
    }

    #[test]
    fn test_custom_dialect() {
        let dialect = Dialect::new().with_delimiter(';').with_quote_char('\'');
        let mut tokenizer = Tokenizer::new(&dialect);
        let mut rows = tokenizer.feed("'a;b';\"c\"\n");
        rows.extend(tokenizer.finish());
        assert_eq!(rows[0].fields, vec!["a;b", "\"c\""]);
        assert_eq!(rows[0].fault, None);
    }

    #[test]
    fn test_row_boundary_tracking() {
        let mut tokenizer = Tokenizer::new(&Dialect::default());
        assert!(tokenizer.at_row_boundary());
        tokenizer.feed("a,\"b");
        assert!(!tokenizer.at_row_boundary());
        assert_eq!(tokenizer.pending_len(), 4);
        tokenizer.feed("\"\r");
        assert!(!tokenizer.at_row_boundary());
        let rows = tokenizer.feed("\n");
        assert_eq!(rows.len(), 1);
        assert!(tokenizer.at_row_boundary());
        assert_eq!(tokenizer.rows_emitted(), 1);
    }

    #[test]
    fn test_current_row_counts_held_back_cr_row() {
        let mut tokenizer = Tokenizer::new(&Dialect::default());
        assert_eq!(tokenizer.current_row(), 1);
        tokenizer.feed("a,b\r");
        assert_eq!(tokenizer.rows_emitted(), 0);
        assert_eq!(tokenizer.current_row(), 2);
        tokenizer.feed("\n");
        assert_eq!(tokenizer.current_row(), 2);
        tokenizer.feed("c\r");
        tokenizer.feed("d");
        assert_eq!(tokenizer.rows_emitted(), 2);
        assert_eq!(tokenizer.current_row(), 3);
    }

    #[test]
    fn test_fields_iterator() {
        let row = Row::new(1, ["x", "y"]);
        let fields: Vec<_> = row.fields().collect();
        assert_eq!(fields[1], Field { column: 1, value: "y" });
    }
}
