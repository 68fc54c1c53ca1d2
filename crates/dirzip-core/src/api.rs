//! High-level public API for building archives.

use std::path::Path;

use crate::ProgressCallback;
use crate::Result;
use crate::creation::ArchiveBuilder;
use crate::creation::ArchiveConfig;
use crate::creation::BuildReport;

/// Builds a zip archive at `dest` from the directory tree at `source_root`.
///
/// Every non-empty regular file whose base name contains none of the
/// configured exclusion fragments becomes one entry, named by its path
/// relative to `source_root` with `/` separators. Directories produce no
/// entries.
///
/// # Arguments
///
/// * `source_root` - Directory to archive
/// * `dest` - Path of the archive to create (truncated if it exists)
/// * `config` - Build configuration
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - `source_root` does not exist or is not a directory
/// - The destination cannot be created
/// - A file cannot be opened or read, or is larger than the size limit
/// - Writing or finalizing the archive fails
///
/// # Examples
///
/// ```no_run
/// use dirzip_core::ArchiveConfig;
/// use dirzip_core::build_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::default();
/// let report = build_archive("./site", "site.zip", &config)?;
/// println!("Archived {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn build_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    source_root: P,
    dest: Q,
    config: &ArchiveConfig,
) -> Result<BuildReport> {
    ArchiveBuilder::new(config.clone()).build(source_root, dest)
}

/// Builds a zip archive with progress reporting.
///
/// Same as [`build_archive`], with callbacks for each entry, each written
/// chunk and each skipped file.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - `source_root` does not exist or is not a directory
/// - The destination cannot be created
/// - A file cannot be opened or read, or is larger than the size limit
/// - Writing or finalizing the archive fails
///
/// # Examples
///
/// ```no_run
/// use dirzip_core::ArchiveConfig;
/// use dirzip_core::NoopProgress;
/// use dirzip_core::build_archive_with_progress;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::default();
/// let mut progress = NoopProgress;
/// let report = build_archive_with_progress("./site", "site.zip", &config, &mut progress)?;
/// println!("Wrote {} bytes", report.archive_size);
/// # Ok(())
/// # }
/// ```
pub fn build_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    source_root: P,
    dest: Q,
    config: &ArchiveConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<BuildReport> {
    ArchiveBuilder::new(config.clone()).build_with_progress(source_root, dest, progress)
}
