//! The open destination archive.
//!
//! An [`ArchiveSession`] owns the zip writer for the duration of one build.
//! The first failed write moves it to [`BuildState::Failed`]; from then on
//! every operation is refused, because the container is in an indeterminate
//! state and must not be finalized as if it were valid.

use crate::ArchiveError;
use crate::Result;
use crate::copy::ChunkedCopier;
use crate::copy::CopyError;
use crate::creation::config::ArchiveConfig;
use crate::creation::config::EntryMethod;
use crate::progress::ProgressCallback;
use log::debug;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

/// Lifecycle of one build.
///
/// `Idle → Building → {Finalized | Failed}`. Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    /// No build has started.
    #[default]
    Idle,
    /// The destination is open and entries are being written.
    Building,
    /// The central directory was written; the archive is usable.
    Finalized,
    /// A step failed; the destination must be discarded.
    Failed,
}

impl BuildState {
    /// Returns `true` for `Finalized` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Building => "building",
            Self::Finalized => "finalized",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A zip container being written to `W`.
///
/// # Examples
///
/// ```
/// use dirzip_core::ArchiveConfig;
/// use dirzip_core::creation::session::ArchiveSession;
/// use dirzip_core::NoopProgress;
/// use std::io::Cursor;
/// use std::path::Path;
///
/// let config = ArchiveConfig::default();
/// let mut session = ArchiveSession::new(Cursor::new(Vec::new()), &config);
/// session.add_reader(
///     "hello.txt",
///     Path::new("hello.txt"),
///     &mut &b"hello"[..],
///     5,
///     None,
///     &mut NoopProgress,
/// )?;
/// let bytes = session.finish()?.into_inner();
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), dirzip_core::ArchiveError>(())
/// ```
pub struct ArchiveSession<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    options: SimpleFileOptions,
    copier: ChunkedCopier,
    preserve_permissions: bool,
    state: BuildState,
    entries_written: usize,
}

impl<W: Write + Seek> ArchiveSession<W> {
    /// Opens a zip container over `writer`.
    #[must_use]
    pub fn new(writer: W, config: &ArchiveConfig) -> Self {
        let options = match config.method {
            EntryMethod::Stored => {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            }
            EntryMethod::Deflated { level } => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(level))),
        };

        Self {
            zip: Some(ZipWriter::new(writer)),
            options,
            copier: ChunkedCopier::new(config.chunk_size, config.max_file_size),
            preserve_permissions: config.preserve_permissions,
            state: BuildState::Building,
            entries_written: 0,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Returns the number of entries written so far.
    #[must_use]
    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// Streams the file at `source` into a new entry called `entry_name`.
    ///
    /// Returns the number of bytes copied.
    pub fn add_file(
        &mut self,
        entry_name: &str,
        source: &Path,
        progress: &mut dyn ProgressCallback,
    ) -> Result<u64> {
        self.ensure_building()?;

        let mut file = match File::open(source) {
            Ok(file) => file,
            Err(e) => {
                return self.fail(ArchiveError::Open {
                    path: source.to_path_buf(),
                    source: e,
                });
            }
        };
        let metadata = match file.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                return self.fail(ArchiveError::Open {
                    path: source.to_path_buf(),
                    source: e,
                });
            }
        };

        let mode = if self.preserve_permissions {
            unix_mode(&metadata)
        } else {
            None
        };

        self.add_reader(
            entry_name,
            source,
            &mut file,
            metadata.len(),
            mode,
            progress,
        )
    }

    /// Streams `reader` into a new entry called `entry_name`.
    ///
    /// `source` is only used to label errors. `size_hint` selects zip64
    /// headers for entries of 4 GiB or more.
    pub fn add_reader<R: Read + ?Sized>(
        &mut self,
        entry_name: &str,
        source: &Path,
        reader: &mut R,
        size_hint: u64,
        unix_mode: Option<u32>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<u64> {
        self.ensure_building()?;

        let mut options = self.options.large_file(size_hint >= u64::from(u32::MAX));
        if let Some(mode) = unix_mode {
            options = options.unix_permissions(mode);
        }

        let result = match self.zip.as_mut() {
            Some(zip) => write_entry(
                zip,
                &mut self.copier,
                entry_name,
                source,
                reader,
                options,
                progress,
            ),
            None => Err(ArchiveError::SessionClosed { state: self.state }),
        };

        match result {
            Ok(copied) => {
                self.entries_written += 1;
                debug!("added {entry_name} ({copied} bytes)");
                Ok(copied)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Writes the central directory and returns the underlying writer.
    pub fn finish(&mut self) -> Result<W> {
        self.ensure_building()?;

        let Some(zip) = self.zip.take() else {
            return self.fail(ArchiveError::SessionClosed { state: self.state });
        };

        match zip.finish() {
            Ok(writer) => {
                self.state = BuildState::Finalized;
                Ok(writer)
            }
            Err(e) => self.fail(ArchiveError::Finalize(e.to_string())),
        }
    }

    fn ensure_building(&self) -> Result<()> {
        if self.state == BuildState::Building {
            Ok(())
        } else {
            Err(ArchiveError::SessionClosed { state: self.state })
        }
    }

    fn fail<T>(&mut self, err: ArchiveError) -> Result<T> {
        self.state = BuildState::Failed;
        Err(err)
    }
}

impl<W: Write + Seek> fmt::Debug for ArchiveSession<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSession")
            .field("state", &self.state)
            .field("entries_written", &self.entries_written)
            .field("chunk_size", &self.copier.chunk_size())
            .finish_non_exhaustive()
    }
}

fn write_entry<W: Write + Seek, R: Read + ?Sized>(
    zip: &mut ZipWriter<W>,
    copier: &mut ChunkedCopier,
    entry_name: &str,
    source: &Path,
    reader: &mut R,
    options: SimpleFileOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<u64> {
    let name = entry_name.to_string();
    zip.start_file(&name, options)
        .map_err(|e| ArchiveError::Write {
            path: source.to_path_buf(),
            source: zip_to_io(e),
        })?;

    copier
        .copy_with_progress(reader, zip, progress)
        .map_err(|e| match e {
            CopyError::Read(source_err) => ArchiveError::Read {
                path: source.to_path_buf(),
                source: source_err,
            },
            CopyError::Write(source_err) => ArchiveError::Write {
                path: source.to_path_buf(),
                source: source_err,
            },
            CopyError::TooLarge { limit } => ArchiveError::FileTooLarge {
                path: source.to_path_buf(),
                limit,
            },
        })
}

fn zip_to_io(err: ZipError) -> std::io::Error {
    match err {
        ZipError::Io(e) => e,
        other => std::io::Error::other(other),
    }
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &std::fs::Metadata) -> Option<u32> {
    None
}
