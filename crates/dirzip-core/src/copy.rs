//! Chunked stream copy with a per-file size ceiling.
//!
//! Files are streamed through one reusable buffer of `chunk_size` bytes, so
//! memory use per file is bounded regardless of the file's length.
//!
//! # Size accounting
//!
//! The ceiling is checked against the number of chunks *attempted*
//! multiplied by the nominal chunk size, not against bytes actually read.
//! Every read, including the final one that hits end of stream, advances the
//! counter by a full chunk. The check therefore trips slightly before the
//! true byte count reaches the limit: a file of exactly `limit` bytes is
//! rejected whenever `limit` is a multiple of the chunk size.

use std::io;
use std::io::Read;
use std::io::Write;
use thiserror::Error;

use crate::progress::NoopProgress;
use crate::progress::ProgressCallback;

/// Default chunk size for streaming file contents (4 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default per-file ceiling (100 GiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024 * 1024;

/// Errors produced by [`ChunkedCopier`].
///
/// Read and write errors are passed through untouched so callers can tell
/// which side of the copy failed.
#[derive(Error, Debug)]
pub enum CopyError {
    /// Reading from the source failed.
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    /// Writing to the destination failed.
    #[error("write error: {0}")]
    Write(#[source] io::Error),

    /// The attempted byte count exceeded the ceiling.
    #[error("file too large (limit {limit} bytes)")]
    TooLarge {
        /// Configured ceiling in bytes.
        limit: u64,
    },
}

/// Copies a reader into a writer one fixed-size chunk at a time.
///
/// The buffer is allocated once and reused across every file in a build.
///
/// # Examples
///
/// ```
/// use dirzip_core::copy::ChunkedCopier;
/// use std::io::Cursor;
///
/// let mut copier = ChunkedCopier::new(4096, 1024 * 1024);
/// let mut input = Cursor::new(b"hello".to_vec());
/// let mut output = Vec::new();
///
/// let copied = copier.copy(&mut input, &mut output)?;
/// assert_eq!(copied, 5);
/// assert_eq!(output, b"hello");
/// # Ok::<(), dirzip_core::copy::CopyError>(())
/// ```
#[derive(Debug)]
pub struct ChunkedCopier {
    buf: Vec<u8>,
    max_size: u64,
}

impl ChunkedCopier {
    /// Creates a copier with the given chunk size and per-file ceiling.
    ///
    /// A `chunk_size` of zero is bumped to one byte; configuration
    /// validation rejects it before a build ever gets here.
    #[must_use]
    pub fn new(chunk_size: usize, max_size: u64) -> Self {
        Self {
            buf: vec![0u8; chunk_size.max(1)],
            max_size,
        }
    }

    /// Returns the chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.buf.len()
    }

    /// Returns the per-file ceiling in bytes.
    #[must_use]
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Copies `src` into `dst` until end of stream.
    ///
    /// Returns the number of bytes copied.
    pub fn copy<R, W>(&mut self, src: &mut R, dst: &mut W) -> Result<u64, CopyError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.copy_with_progress(src, dst, &mut NoopProgress)
    }

    /// Copies `src` into `dst`, reporting every written chunk.
    pub fn copy_with_progress<R, W>(
        &mut self,
        src: &mut R,
        dst: &mut W,
        progress: &mut dyn ProgressCallback,
    ) -> Result<u64, CopyError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let chunk = self.buf.len() as u64;
        let mut attempted: u64 = 0;
        let mut copied: u64 = 0;

        loop {
            attempted = attempted
                .checked_add(chunk)
                .filter(|&n| n <= self.max_size)
                .ok_or(CopyError::TooLarge {
                    limit: self.max_size,
                })?;

            let bytes_read = read_retrying(src, &mut self.buf).map_err(CopyError::Read)?;
            if bytes_read == 0 {
                break;
            }

            dst.write_all(&self.buf[..bytes_read])
                .map_err(CopyError::Write)?;
            copied += bytes_read as u64;
            progress.on_bytes_written(bytes_read as u64);
        }

        Ok(copied)
    }
}

impl Default for ChunkedCopier {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_FILE_SIZE)
    }
}

/// Reads once, retrying on `Interrupted` without counting another chunk.
fn read_retrying<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match src.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}
