//! Local file source.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tracing::{info, instrument};

use super::{ChunkSource, ReaderSource, DEFAULT_CHUNK_SIZE};
use crate::error::{Result, TermError};
use crate::validator::StreamingValidator;

/// A CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    chunk_size: usize,
}

impl FileSource {
    /// Creates a source for `path`. The file is opened when the source is driven.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the size of each read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl ChunkSource for FileSource {
    #[instrument(skip(self, validator), fields(path = %self.path.display()))]
    fn drive(&mut self, validator: &mut StreamingValidator) -> Result<usize> {
        let file = File::open(&self.path).map_err(|e| {
            TermError::data_source_with_source(
                "file",
                format!("cannot open {}", self.path.display()),
                Box::new(e),
            )
        })?;
        let bytes = ReaderSource::new(BufReader::new(file))
            .with_chunk_size(self.chunk_size)
            .drive(validator)?;
        info!(
            bytes,
            rows = validator.row_count(),
            valid = validator.is_valid(),
            "validated file"
        );
        Ok(bytes)
    }

    fn description(&self) -> String {
        format!("file {}", self.path.display())
    }
}
