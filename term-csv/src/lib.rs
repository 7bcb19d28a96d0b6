//! # term-csv - Streaming CSV Validation for Rust
//!
//! term-csv checks that a CSV stream is well formed while it is still arriving.
//! The stream is handed over as an ordered series of chunks that may end
//! anywhere, even inside a quoted field or between the `\r` and `\n` of a line
//! break, and the findings are exactly those a single-chunk run would produce.
//!
//! ## Quick Start
//!
//! ```rust
//! use term_csv::prelude::*;
//!
//! let mut validator = StreamingValidator::builder()
//!     .dialect(Dialect::new().with_header(true))
//!     .build()?;
//!
//! validator.submit_chunk("name,born\r\nAda,1815\r\n\"Grace");
//! validator.submit_chunk(" Hopper\",1906\r\n,\r\n");
//! validator.finalize();
//!
//! assert!(!validator.is_valid());
//! for message in validator.errors() {
//!     println!("{message}");
//! }
//! assert_eq!(validator.errors()[0].tag, MessageTag::BlankRows);
//! assert_eq!(validator.errors()[0].row, Some(4));
//! # Ok::<(), TermError>(())
//! ```
//!
//! ## What gets reported
//!
//! Every finding is a [`Message`](core::Message) with a tag, a category and a
//! level. Only errors make a stream invalid.
//!
//! - **Errors**: `unclosed_quote`, `stray_quote`, `whitespace`, `blank_rows`,
//!   `line_breaks`, `invalid_encoding`
//! - **Warnings**: `duplicate_column_name`, `empty_column_name`,
//!   `inconsistent_values`, `ragged_rows`
//! - **Info**: `assumed_header`, `nonrfc_line_breaks`
//!
//! A malformed row carries exactly one fault, the most specific one
//! (`unclosed_quote` before `stray_quote` before `whitespace`).
//!
//! ## Architecture
//!
//! - **`tokenizer`**: chunk-safe quote-aware state machine producing rows
//! - **`line_breaks`**: tracks which terminators the stream actually uses
//! - **`header`**: header presence decision and column name checks
//! - **`profiler`**: per-column value format histograms
//! - **`validator`**: the orchestrator owning all cross-chunk state
//! - **`encoding`**: UTF-8 decoding of byte chunks
//! - **`sources`**: readers and files driven into a validator
//! - **`core`**: message, level and report types
//! - **`dialect`**: delimiter, quoting and terminator conventions
//!
//! ## Observability
//!
//! Events are emitted with the `tracing` crate. Install any subscriber, or use
//! [`logging::setup::init_logging`]; per-row detail is controlled by
//! [`logging::LogConfig`].

pub mod core;
pub mod dialect;
pub mod encoding;
pub mod error;
pub mod header;
pub mod line_breaks;
pub mod logging;
pub mod prelude;
pub mod profiler;
pub mod sources;
pub mod tokenizer;
pub mod validator;
