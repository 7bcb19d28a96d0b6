//! Chunked reading from any `std::io::Read`.

use std::fmt::Debug;
use std::io::{ErrorKind, Read};

use tracing::{debug, instrument};

use super::{ChunkSource, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::validator::StreamingValidator;

/// Reads byte chunks from a reader and submits them as they arrive.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read + Debug> ReaderSource<R> {
    /// Creates a source reading [`DEFAULT_CHUNK_SIZE`] bytes at a time.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the size of each read. Values below 1 are raised to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns the reader back.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Debug> ChunkSource for ReaderSource<R> {
    #[instrument(skip_all, fields(chunk_size = self.chunk_size))]
    fn drive(&mut self, validator: &mut StreamingValidator) -> Result<usize> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total = 0;
        let mut chunks = 0usize;
        loop {
            let read = match self.reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            validator.submit_bytes(&buffer[..read]);
            total += read;
            chunks += 1;
            if validator.is_truncated() {
                debug!(bytes = total, "row limit reached, stopped reading");
                break;
            }
        }
        validator.finalize();
        debug!(bytes = total, chunks, "source exhausted");
        Ok(total)
    }

    fn description(&self) -> String {
        format!("reader ({} byte chunks)", self.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Fails once with `Interrupted`, then reads normally.
    #[derive(Debug)]
    struct Flaky {
        inner: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(ErrorKind::Interrupted, "try again"));
            }
            self.inner.read(buf)
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_small_chunks_match_single_chunk() {
        let data = "id,name\r\n1,\"Ada\r\nLovelace\"\r\n2,\"x\"y\r\n";
        let mut whole = StreamingValidator::new();
        whole.submit_chunk(data);
        whole.finalize();

        let mut chunked = StreamingValidator::new();
        let read = ReaderSource::new(Cursor::new(data))
            .with_chunk_size(1)
            .drive(&mut chunked)
            .unwrap();
        assert_eq!(read, data.len());
        assert_eq!(chunked.errors(), whole.errors());
        assert_eq!(chunked.info_messages(), whole.info_messages());
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let mut validator = StreamingValidator::new();
        let mut source = ReaderSource::new(Flaky {
            inner: Cursor::new(b"a\r\n1\r\n".to_vec()),
            interrupted: false,
        });
        assert_eq!(source.drive(&mut validator).unwrap(), 6);
        assert_eq!(validator.row_count(), 2);
    }

    #[test]
    fn test_read_error_is_returned() {
        let mut validator = StreamingValidator::new();
        let err = ReaderSource::new(Broken).drive(&mut validator).unwrap_err();
        assert!(matches!(err, crate::error::TermError::Io(_)));
        assert!(!validator.is_finalized());
    }

    #[test]
    fn test_zero_chunk_size_is_raised() {
        let source = ReaderSource::new(Cursor::new("")).with_chunk_size(0);
        assert_eq!(source.description(), "reader (1 byte chunks)");
    }
}
