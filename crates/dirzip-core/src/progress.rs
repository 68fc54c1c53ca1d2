//! Progress reporting hooks for archive building.
//!
//! The walk is lazy, so the total number of entries is never known up front.
//! Callbacks receive a running 1-indexed entry number instead.

use std::fmt;
use std::path::Path;

/// Why a visited filesystem entry was left out of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Zero-length regular file.
    Empty,
    /// Base name contains an exclusion fragment.
    Excluded,
    /// Not a regular file (symlink, socket, device, ...).
    NotRegularFile,
    /// The entry is the archive being written.
    Destination,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty file"),
            Self::Excluded => f.write_str("excluded"),
            Self::NotRegularFile => f.write_str("not a regular file"),
            Self::Destination => f.write_str("destination archive"),
        }
    }
}

/// Callback trait for progress reporting during archive building.
///
/// # Examples
///
/// ```
/// use dirzip_core::ProgressCallback;
/// use dirzip_core::SkipReason;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &Path, current: usize) {
///         println!("[{current}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_skip(&mut self, path: &Path, reason: SkipReason) {
///         println!("skip {} ({reason})", path.display());
///     }
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before a file's bytes are copied into a new entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Archive entry name of the file
    /// * `current` - Running entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, current: usize);

    /// Called after each chunk is written into the archive.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called once an entry has been fully written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called for every non-directory entry that is not archived.
    fn on_skip(&mut self, _path: &Path, _reason: SkipReason) {}

    /// Called once after the archive has been finalized.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

/// Wraps a `ProgressCallback` and numbers entries as they start.
pub(crate) struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(progress: &'a mut dyn ProgressCallback) -> Self {
        Self {
            progress,
            current_entry: 0,
        }
    }

    pub(crate) fn on_entry_start(&mut self, path: &Path) {
        self.current_entry += 1;
        self.progress.on_entry_start(path, self.current_entry);
    }

    pub(crate) fn on_entry_complete(&mut self, path: &Path) {
        self.progress.on_entry_complete(path);
    }

    pub(crate) fn on_skip(&mut self, path: &Path, reason: SkipReason) {
        self.progress.on_skip(path, reason);
    }

    pub(crate) fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    pub(crate) fn callback(&mut self) -> &mut dyn ProgressCallback {
        &mut *self.progress
    }
}
