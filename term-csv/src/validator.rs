//! The streaming validation engine.
//!
//! A [`StreamingValidator`] accepts a CSV stream as an ordered series of chunks,
//! which may end anywhere: mid-field, mid-quote or between the `\r` and `\n` of a
//! terminator. Every row a chunk completes is checked straight away; the verdict
//! is available once [`finalize`](StreamingValidator::finalize) has flushed the
//! last partial row.
//!
//! Faults never abort the stream. They are recorded as [`Message`]s in three
//! append-only lists, and a stream is valid exactly when the error list is empty.
//!
//! # Examples
//!
//! ```rust
//! use term_csv::core::MessageTag;
//! use term_csv::dialect::{Dialect, Terminator};
//! use term_csv::validator::StreamingValidator;
//!
//! let dialect = Dialect::new()
//!     .with_header(true)
//!     .with_line_terminator(Terminator::CrLf);
//! let mut validator = StreamingValidator::with_dialect(dialect)?;
//!
//! validator.submit_chunk("id,name\r\n1,\"Ada");
//! validator.submit_chunk(" Lovelace\"\r\n2,Grace\n");
//! validator.finalize();
//!
//! assert!(!validator.is_valid());
//! assert_eq!(validator.errors()[0].tag, MessageTag::LineBreaks);
//! assert_eq!(validator.row_count(), 3);
//! # Ok::<(), term_csv::error::TermError>(())
//! ```

use tracing::{debug, instrument, warn};

use crate::core::{Level, Message, MessageTag, ValidationReport};
use crate::dialect::{Dialect, Terminator};
use crate::encoding::Utf8Decoder;
use crate::error::{Result, TermError};
use crate::header::{check_header, HeaderDecision, HeaderResolver};
use crate::line_breaks::{LineBreakFinding, LineBreakTracker};
use crate::logging::{truncate_field, LogConfig};
use crate::profiler::{ColumnProfile, ColumnProfiler};
use crate::tokenizer::{Row, Tokenizer};

/// Options for one validation run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Syntactic conventions of the stream
    pub dialect: Dialect,
    /// Stop checking after this many rows
    pub limit_lines: Option<usize>,
    /// Share of non-blank values the dominant format needs for a column to count
    /// as consistent (default: 1.0, every value)
    pub consistency_threshold: f64,
    /// Logging verbosity
    pub log: LogConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            limit_lines: None,
            consistency_threshold: 1.0,
            log: LogConfig::default(),
        }
    }
}

impl ValidatorConfig {
    /// Checks the dialect and engine options.
    pub fn validate(&self) -> Result<()> {
        self.dialect.validate()?;
        if !(self.consistency_threshold > 0.0 && self.consistency_threshold <= 1.0) {
            return Err(TermError::configuration(format!(
                "consistency threshold must be in (0, 1], got {}",
                self.consistency_threshold
            )));
        }
        if self.limit_lines == Some(0) {
            return Err(TermError::configuration("row limit must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for [`StreamingValidator`].
///
/// # Examples
///
/// ```rust
/// use term_csv::dialect::{Dialect, Terminator};
/// use term_csv::validator::StreamingValidator;
///
/// let validator = StreamingValidator::builder()
///     .dialect(Dialect::new().with_delimiter(';'))
///     .line_terminator(Terminator::Lf)
///     .limit_lines(10_000)
///     .consistency_threshold(0.9)
///     .build()?;
/// assert_eq!(validator.dialect().line_terminator, Some(Terminator::Lf));
/// # Ok::<(), term_csv::error::TermError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamingValidatorBuilder {
    config: ValidatorConfig,
    line_terminator: Option<Terminator>,
    initial_chunk: Option<String>,
}

impl StreamingValidatorBuilder {
    /// Sets the dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Declares the expected terminator, overriding the dialect's.
    pub fn line_terminator(mut self, terminator: Terminator) -> Self {
        self.line_terminator = Some(terminator);
        self
    }

    /// Stops checking after `limit` rows.
    pub fn limit_lines(mut self, limit: usize) -> Self {
        self.config.limit_lines = Some(limit);
        self
    }

    /// Sets the dominance share a column needs to be consistent.
    pub fn consistency_threshold(mut self, threshold: f64) -> Self {
        self.config.consistency_threshold = threshold;
        self
    }

    /// Sets the logging configuration.
    pub fn log_config(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Submits `chunk` right after construction.
    pub fn initial_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.initial_chunk = Some(chunk.into());
        self
    }

    /// Validates the configuration and builds the validator.
    pub fn build(self) -> Result<StreamingValidator> {
        let mut config = self.config;
        if let Some(terminator) = self.line_terminator {
            config.dialect.line_terminator = Some(terminator);
        }
        let mut validator = StreamingValidator::with_config(config)?;
        if let Some(chunk) = self.initial_chunk {
            validator.submit_chunk(&chunk);
        }
        Ok(validator)
    }
}

/// Everything carried from one chunk to the next, apart from the partial row
/// buffered by the tokenizer.
#[derive(Debug)]
struct ValidatorState {
    row_count: usize,
    header: HeaderResolver,
    line_breaks: LineBreakTracker,
    profiler: ColumnProfiler,
    expected_width: Option<usize>,
    errors: Vec<Message>,
    warnings: Vec<Message>,
    info_messages: Vec<Message>,
    encoding_reported: bool,
    truncated: bool,
    finalized: bool,
}

impl ValidatorState {
    fn new(dialect: &Dialect) -> Self {
        Self {
            row_count: 0,
            header: HeaderResolver::new(dialect.header),
            line_breaks: LineBreakTracker::new(dialect.line_terminator),
            profiler: ColumnProfiler::new(),
            expected_width: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            info_messages: Vec::new(),
            encoding_reported: false,
            truncated: false,
            finalized: false,
        }
    }

    fn push(&mut self, log: &LogConfig, message: Message) {
        crate::log_fault!(
            log,
            tag = %message.tag,
            level = %message.level,
            row = ?message.row,
            column = ?message.column,
            "recorded message"
        );
        match message.level {
            Level::Error => self.errors.push(message),
            Level::Warning => self.warnings.push(message),
            Level::Info => self.info_messages.push(message),
        }
    }
}

/// Incremental CSV validator for one stream.
#[derive(Debug)]
pub struct StreamingValidator {
    config: ValidatorConfig,
    tokenizer: Tokenizer,
    decoder: Utf8Decoder,
    state: ValidatorState,
}

impl Default for StreamingValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingValidator {
    /// Creates a validator with the default dialect and no header setting.
    pub fn new() -> Self {
        Self::from_valid_config(ValidatorConfig::default())
    }

    /// Creates a validator for `dialect`.
    pub fn with_dialect(dialect: Dialect) -> Result<Self> {
        Self::with_config(ValidatorConfig {
            dialect,
            ..ValidatorConfig::default()
        })
    }

    /// Creates a validator from a full configuration.
    pub fn with_config(config: ValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Creates a new builder.
    pub fn builder() -> StreamingValidatorBuilder {
        StreamingValidatorBuilder::default()
    }

    fn from_valid_config(config: ValidatorConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(&config.dialect),
            decoder: Utf8Decoder::new(),
            state: ValidatorState::new(&config.dialect),
            config,
        }
    }

    /// Validates every row `chunk` completes.
    ///
    /// Whatever is left of a partial row is kept for the next chunk. Chunks
    /// submitted after [`finalize`](Self::finalize) are ignored.
    #[instrument(level = "debug", skip_all, fields(len = chunk.len()))]
    pub fn submit_chunk(&mut self, chunk: &str) {
        if self.state.finalized {
            warn!("chunk submitted after finalize, ignoring");
            return;
        }
        self.feed(chunk);
    }

    /// Validates a chunk of raw bytes.
    ///
    /// The bytes must be UTF-8; a character split across two chunks is put back
    /// together. Invalid bytes are read as U+FFFD and reported once per run.
    pub fn submit_bytes(&mut self, bytes: &[u8]) {
        if self.state.finalized {
            warn!("bytes submitted after finalize, ignoring");
            return;
        }
        let (text, first_invalid) = self.decoder.decode(bytes);
        match first_invalid {
            Some(offset) => {
                let (before, after) = text.split_at(offset);
                self.feed(before);
                self.record_invalid_encoding();
                self.feed(after);
            }
            None => self.feed(&text),
        }
    }

    /// Ends the stream.
    ///
    /// Flushes the final partial row, resolves a header decision that no row
    /// settled, and reports columns mixing value formats. Calling it again has no
    /// effect.
    #[instrument(level = "debug", skip_all)]
    pub fn finalize(&mut self) {
        if self.state.finalized {
            return;
        }
        if self.decoder.finish() {
            self.record_invalid_encoding();
            self.feed("\u{FFFD}");
        }
        for row in self.tokenizer.finish() {
            self.process_row(row);
        }

        let log = &self.config.log;
        let state = &mut self.state;
        if let Some(info) = state.header.resolve() {
            state.push(log, info);
        }
        for column in state
            .profiler
            .inconsistent_columns(self.config.consistency_threshold)
        {
            let summary = state.profiler.columns()[column].summary();
            state.push(
                log,
                Message::new(MessageTag::InconsistentValues)
                    .at_column(column + 1)
                    .with_content(summary),
            );
        }
        state.finalized = true;

        debug!(
            rows = state.row_count,
            errors = state.errors.len(),
            warnings = state.warnings.len(),
            info = state.info_messages.len(),
            truncated = state.truncated,
            "validation finished"
        );
    }

    /// Submits every chunk, finalizes and returns the verdict.
    pub fn validate_chunks<I, S>(&mut self, chunks: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for chunk in chunks {
            self.submit_chunk(chunk.as_ref());
        }
        self.finalize();
        self.is_valid()
    }

    /// Checks a row of column names, recording any warnings at row 1.
    ///
    /// Returns true when the row can serve as a header. Duplicate or empty names
    /// produce warnings but do not make the row unusable.
    pub fn validate_header<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        let check = check_header(names, 1);
        for warning in check.warnings {
            self.state.push(&self.config.log, warning);
        }
        check.usable
    }

    /// Returns true if no error has been recorded.
    pub fn is_valid(&self) -> bool {
        self.state.errors.is_empty()
    }

    /// Error-level messages, in the order they were found.
    pub fn errors(&self) -> &[Message] {
        &self.state.errors
    }

    /// Warning-level messages, in the order they were found.
    pub fn warnings(&self) -> &[Message] {
        &self.state.warnings
    }

    /// Info-level messages, in the order they were found.
    pub fn info_messages(&self) -> &[Message] {
        &self.state.info_messages
    }

    /// Number of rows processed, header included.
    pub fn row_count(&self) -> usize {
        self.state.row_count
    }

    /// Whether the first row is a header, once decided.
    pub fn header_decision(&self) -> HeaderDecision {
        self.state.header.decision()
    }

    /// Value format histograms, indexed by 0-based column.
    pub fn column_profiles(&self) -> &[ColumnProfile] {
        self.state.profiler.columns()
    }

    /// The first terminator seen in the stream.
    pub fn line_break(&self) -> Option<Terminator> {
        self.state.line_breaks.line_break()
    }

    /// Every distinct terminator seen, in order of first appearance.
    pub fn observed_line_breaks(&self) -> &[Terminator] {
        self.state.line_breaks.observed()
    }

    /// Returns true if the row limit stopped checking early.
    pub fn is_truncated(&self) -> bool {
        self.state.truncated
    }

    /// Returns true once [`finalize`](Self::finalize) has run.
    pub fn is_finalized(&self) -> bool {
        self.state.finalized
    }

    /// The dialect in use.
    pub fn dialect(&self) -> &Dialect {
        &self.config.dialect
    }

    /// The configuration in use.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Takes a snapshot of the findings so far.
    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            valid: self.is_valid(),
            row_count: self.state.row_count,
            truncated: self.state.truncated,
            header: self.state.header.decision(),
            errors: self.state.errors.clone(),
            warnings: self.state.warnings.clone(),
            info_messages: self.state.info_messages.clone(),
            column_profiles: self.state.profiler.columns().to_vec(),
        }
    }

    fn feed(&mut self, text: &str) {
        if self.state.truncated || text.is_empty() {
            return;
        }
        crate::log_chunk!(
            self.config.log,
            len = text.len(),
            pending = self.tokenizer.pending_len(),
            "feeding text"
        );
        for row in self.tokenizer.feed(text) {
            self.process_row(row);
        }
    }

    fn record_invalid_encoding(&mut self) {
        if self.state.encoding_reported || self.state.truncated {
            return;
        }
        self.state.encoding_reported = true;
        let row = self.tokenizer.current_row();
        self.state.push(
            &self.config.log,
            Message::new(MessageTag::InvalidEncoding).at_row(row),
        );
    }

    fn process_row(&mut self, row: Row) {
        let log = &self.config.log;
        let dialect = &self.config.dialect;
        let state = &mut self.state;

        if let Some(limit) = self.config.limit_lines {
            if state.row_count >= limit {
                if !state.truncated {
                    debug!(limit, "row limit reached, ignoring the rest of the stream");
                    state.truncated = true;
                }
                return;
            }
        }
        state.row_count += 1;
        state.profiler.ensure_width(row.width());
        crate::log_row!(
            log,
            row = row.number,
            width = row.width(),
            raw = %truncate_field(&row.raw, log.max_field_length),
            "row completed"
        );

        if let Some(terminator) = row.terminator {
            match state.line_breaks.observe(terminator) {
                Some(LineBreakFinding::Mismatch { expected, found }) => {
                    crate::perf_debug!(
                        log,
                        %expected,
                        %found,
                        row = row.number,
                        "unexpected line break"
                    );
                    state.push(
                        log,
                        Message::new(MessageTag::LineBreaks)
                            .at_row(row.number)
                            .with_content(found.as_str()),
                    );
                }
                Some(LineBreakFinding::NonRfc(found)) => {
                    state.push(
                        log,
                        Message::new(MessageTag::NonrfcLineBreaks)
                            .at_row(row.number)
                            .with_content(found.as_str()),
                    );
                }
                None => {}
            }
        }

        if let Some(fault) = row.fault {
            state.push(
                log,
                Message::new(fault.tag())
                    .at_row(row.number)
                    .with_content(row.raw.as_str()),
            );
        }

        let blank = row.fault.is_none() && row.is_blank();
        if blank {
            if dialect.skip_blank_rows {
                return;
            }
            state.push(
                log,
                Message::new(MessageTag::BlankRows)
                    .at_row(row.number)
                    .with_content(row.raw.as_str()),
            );
        }

        if state.header.decision() == HeaderDecision::Unresolved {
            if let Some(info) = state.header.resolve() {
                state.push(log, info);
            }
            if state.header.has_header() {
                if row.fault.is_none() && !blank {
                    let check = check_header(&row.fields, row.number);
                    for warning in check.warnings {
                        state.push(log, warning);
                    }
                    if check.usable {
                        state.expected_width = Some(row.width());
                    }
                }
                return;
            }
        }

        if row.fault.is_some() || blank {
            return;
        }
        match state.expected_width {
            None => state.expected_width = Some(row.width()),
            Some(expected) if expected != row.width() => {
                state.push(
                    log,
                    Message::new(MessageTag::RaggedRows)
                        .at_row(row.number)
                        .with_content(row.raw.as_str()),
                );
            }
            Some(_) => {}
        }
        state.profiler.observe_row(&row);
    }
}
