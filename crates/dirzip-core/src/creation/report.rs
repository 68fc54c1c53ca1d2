//! Archive build reporting.

use std::time::Duration;

/// Statistics about one successful build.
///
/// # Examples
///
/// ```
/// use dirzip_core::BuildReport;
///
/// let mut report = BuildReport::default();
/// report.bytes_written = 1000;
/// report.archive_size = 250;
/// report.files_excluded = 2;
/// report.files_skipped_empty = 1;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.files_skipped(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of files written as archive entries.
    pub files_added: usize,

    /// Uncompressed bytes copied into entries.
    pub bytes_written: u64,

    /// Size of the finished archive in bytes.
    pub archive_size: u64,

    /// Directories traversed, including the root.
    pub directories_visited: usize,

    /// Zero-length regular files left out.
    pub files_skipped_empty: usize,

    /// Regular files left out because their name matched an exclusion.
    pub files_excluded: usize,

    /// Symlinks, sockets and other non-regular entries left out.
    pub entries_skipped_other: usize,

    /// Times the archive being written was met inside the source tree.
    pub files_skipped_destination: usize,

    /// Entry names in the order they were written.
    pub entries: Vec<String>,

    /// Duration of the build.
    pub duration: Duration,

    /// Warnings generated during the build.
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Total number of visited non-directory entries that were not archived.
    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.files_skipped_empty
            + self.files_excluded
            + self.entries_skipped_other
            + self.files_skipped_destination
    }

    /// Returns uncompressed / archive size, or 0.0 when either is zero.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.archive_size as f64
    }
}
