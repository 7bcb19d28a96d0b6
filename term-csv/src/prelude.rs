//! Prelude for commonly used types and traits in term-csv.

pub use crate::core::{Category, Level, Message, MessageTag, ValidationReport};
pub use crate::dialect::{Dialect, Terminator};
pub use crate::error::{Result, TermError};
pub use crate::logging::LogConfig;
pub use crate::sources::{validate_path, validate_reader, ChunkSource, FileSource, ReaderSource};
pub use crate::validator::{StreamingValidator, StreamingValidatorBuilder, ValidatorConfig};
