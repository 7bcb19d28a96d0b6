//! Chunk sources that feed a stream into a [`StreamingValidator`].
//!
//! The validator itself never performs I/O. A source reads its input in
//! fixed-size byte chunks, hands them over in order and signals the end of the
//! stream by calling [`finalize`](StreamingValidator::finalize).

use std::fmt::Debug;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::validator::StreamingValidator;

mod file;
mod reader;

pub use file::FileSource;
pub use reader::ReaderSource;

/// Default size of the byte chunks read from a source.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A source of ordered chunks for one validation run.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use term_csv::sources::{ChunkSource, ReaderSource};
/// use term_csv::validator::StreamingValidator;
///
/// let mut source = ReaderSource::new(Cursor::new("a,b\r\n1,2\r\n")).with_chunk_size(3);
/// let mut validator = StreamingValidator::new();
/// let bytes = source.drive(&mut validator)?;
///
/// assert_eq!(bytes, 10);
/// assert!(validator.is_finalized());
/// assert!(validator.is_valid());
/// # Ok::<(), term_csv::error::TermError>(())
/// ```
pub trait ChunkSource: Debug {
    /// Submits the whole input to `validator` and finalizes it.
    ///
    /// Returns the number of bytes read. Faults in the data are recorded on the
    /// validator; only failures to read the input are returned as errors.
    fn drive(&mut self, validator: &mut StreamingValidator) -> Result<usize>;

    /// Returns a human-readable description of this source.
    fn description(&self) -> String;
}

/// Validates everything `reader` yields with a validator built from `validator`.
///
/// Returns the validator so its messages can be inspected.
pub fn validate_reader<R: Read + Debug>(
    reader: R,
    mut validator: StreamingValidator,
) -> Result<StreamingValidator> {
    ReaderSource::new(reader).drive(&mut validator)?;
    Ok(validator)
}

/// Validates a local file.
pub fn validate_path(
    path: impl AsRef<Path>,
    mut validator: StreamingValidator,
) -> Result<StreamingValidator> {
    FileSource::new(path.as_ref()).drive(&mut validator)?;
    Ok(validator)
}
