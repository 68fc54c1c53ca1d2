//! Configuration for archive building.

use crate::ArchiveError;
use crate::Result;
use crate::copy::DEFAULT_CHUNK_SIZE;
use crate::copy::DEFAULT_MAX_FILE_SIZE;

/// Exclusion fragments applied when the caller supplies none of its own.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[".DS_Store", ".zip", ".conf"];

/// How file contents are stored inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMethod {
    /// Uncompressed.
    #[default]
    Stored,
    /// Deflate with the given level (1-9).
    Deflated {
        /// Compression level, 1 (fastest) to 9 (smallest).
        level: u8,
    },
}

/// Configuration for building an archive from a directory.
///
/// Passed explicitly into every build; there is no process-wide state.
///
/// # Examples
///
/// ```
/// use dirzip_core::ArchiveConfig;
///
/// let config = ArchiveConfig::default()
///     .exclude(".log")
///     .with_max_file_size(10 * 1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Substring fragments; a file whose base name contains any of them is
    /// left out of the archive.
    ///
    /// Matching is deliberately loose: the fragment `"a"` excludes every
    /// name containing the letter `a`.
    ///
    /// Default: `[".DS_Store", ".zip", ".conf"]`.
    pub exclusions: Vec<String>,

    /// Per-file ceiling in bytes, enforced while copying.
    ///
    /// Default: 100 GiB.
    pub max_file_size: u64,

    /// Size of the copy buffer in bytes.
    ///
    /// Default: 4096.
    pub chunk_size: usize,

    /// Storage method for every entry.
    ///
    /// Default: [`EntryMethod::Stored`].
    pub method: EntryMethod,

    /// Record unix permission bits of source files in the archive.
    ///
    /// Default: `true`. Ignored on non-unix hosts.
    pub preserve_permissions: bool,

    /// Follow symbolic links during the walk.
    ///
    /// Default: `false`, in which case symlinks are skipped as
    /// non-regular files.
    pub follow_symlinks: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            exclusions: DEFAULT_EXCLUSIONS.iter().map(ToString::to_string).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            method: EntryMethod::Stored,
            preserve_permissions: true,
            follow_symlinks: false,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the exclusion list.
    #[must_use]
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one exclusion fragment.
    #[must_use]
    pub fn exclude<S: Into<String>>(mut self, fragment: S) -> Self {
        self.exclusions.push(fragment.into());
        self
    }

    /// Sets the per-file ceiling.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Sets the copy chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the entry storage method.
    #[must_use]
    pub fn with_method(mut self, method: EntryMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets whether unix permissions are recorded.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets whether symlinks are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An exclusion fragment is empty (it would exclude every file)
    /// - `chunk_size` is zero
    /// - `max_file_size` is zero
    /// - A deflate level is outside 1-9
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.exclusions.iter().position(String::is_empty) {
            return Err(ArchiveError::EmptyExclusionFragment { index });
        }
        if self.chunk_size == 0 {
            return Err(ArchiveError::InvalidChunkSize);
        }
        if self.max_file_size == 0 {
            return Err(ArchiveError::InvalidSizeLimit);
        }
        if let EntryMethod::Deflated { level } = self.method
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
