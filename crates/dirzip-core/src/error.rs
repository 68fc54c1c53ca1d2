//! Error types for archive building operations.

use crate::creation::session::BuildState;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Broad classification of an [`ArchiveError`].
///
/// Every variant of `ArchiveError` maps onto exactly one kind. All kinds are
/// fatal to the build that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source root does not exist or is not a directory.
    SourceNotFound,
    /// A file within the tree could not be opened or read.
    OpenFailure,
    /// A single file exceeded the configured size ceiling.
    SizeLimitExceeded,
    /// The destination archive could not accept more data.
    WriteFailure,
    /// The archive's central directory could not be written.
    FinalizeFailure,
    /// The directory tree could not be traversed.
    Walk,
    /// The supplied configuration is invalid.
    Configuration,
}

/// Errors that can occur while building an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Source root does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Source root exists but is not a directory.
    #[error("source is not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Destination archive file could not be created.
    #[error("cannot create archive {path}: {source}")]
    CreateDestination {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A source file could not be opened for reading.
    #[error("cannot open {path}: {source}")]
    Open {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A source file was judged larger than the per-file ceiling.
    #[error("file too large to archive: {path} (limit {limit} bytes)")]
    FileTooLarge {
        /// File that exceeded the limit.
        path: PathBuf,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// Reading a source file failed mid-copy.
    #[error("read failed for {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing into the archive failed.
    #[error("write failed for entry {path}: {source}")]
    Write {
        /// Source file whose entry was being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The archive's central directory could not be written.
    #[error("failed to finalize archive: {0}")]
    Finalize(String),

    /// Directory traversal failed.
    #[error("cannot walk {path}: {reason}")]
    Walk {
        /// Path at which traversal failed.
        path: PathBuf,
        /// Description from the walker.
        reason: String,
    },

    /// A visited path is not below the source root.
    #[error("path {path} is not under root directory {root}")]
    PathOutsideRoot {
        /// The visited path.
        path: PathBuf,
        /// The source root.
        root: PathBuf,
    },

    /// A path component is not valid UTF-8 and cannot be stored as a zip name.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// The archive session already reached a terminal state.
    #[error("archive session is {state}; no further entries can be written")]
    SessionClosed {
        /// State the session was in.
        state: BuildState,
    },

    /// An exclusion fragment is the empty string.
    #[error("exclusion fragment #{index} is empty and would exclude every file")]
    EmptyExclusionFragment {
        /// Position of the fragment in the exclusion list.
        index: usize,
    },

    /// Chunk size of zero was configured.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    /// Per-file size limit of zero was configured.
    #[error("per-file size limit must be greater than zero")]
    InvalidSizeLimit,

    /// Deflate level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl ArchiveError {
    /// Returns the broad kind of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirzip_core::ArchiveError;
    /// use dirzip_core::ErrorKind;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::FileTooLarge {
    ///     path: PathBuf::from("huge.bin"),
    ///     limit: 1024,
    /// };
    /// assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } | Self::NotADirectory { .. } => ErrorKind::SourceNotFound,
            Self::Open { .. } | Self::Read { .. } => ErrorKind::OpenFailure,
            Self::FileTooLarge { .. } => ErrorKind::SizeLimitExceeded,
            Self::CreateDestination { .. }
            | Self::Write { .. }
            | Self::SessionClosed { .. } => ErrorKind::WriteFailure,
            Self::Finalize(_) => ErrorKind::FinalizeFailure,
            Self::Walk { .. } | Self::PathOutsideRoot { .. } | Self::NonUtf8Path { .. } => {
                ErrorKind::Walk
            }
            Self::EmptyExclusionFragment { .. }
            | Self::InvalidChunkSize
            | Self::InvalidSizeLimit
            | Self::InvalidCompressionLevel { .. } => ErrorKind::Configuration,
        }
    }

    /// Returns the filesystem path this error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::SourceNotFound { path }
            | Self::NotADirectory { path }
            | Self::CreateDestination { path, .. }
            | Self::Open { path, .. }
            | Self::FileTooLarge { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Walk { path, .. }
            | Self::PathOutsideRoot { path, .. }
            | Self::NonUtf8Path { path } => Some(path),
            _ => None,
        }
    }
}
