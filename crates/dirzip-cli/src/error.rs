//! Error conversion utilities for CLI.
//!
//! Converts dirzip-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use dirzip_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, source: &Path) -> anyhow::Error {
    match err {
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "Source directory not found: {}\n\
                 HINT: Check the path; the source must be an existing directory.",
                path.display()
            )
        }
        ArchiveError::NotADirectory { path } => {
            anyhow!(
                "Not a directory: {}\n\
                 HINT: dirzip archives whole directories. Pass the directory that contains the file.",
                path.display()
            )
        }
        ArchiveError::FileTooLarge { path, limit } => {
            anyhow!(
                "File '{}' in '{}' exceeds the per-file limit of {} bytes\n\
                 HINT: Use --max-file-size to raise the limit, or -x to exclude the file.",
                path.display(),
                source.display(),
                limit
            )
        }
        ArchiveError::Open { path, source: io_err } => {
            anyhow!(
                "Cannot open '{}': {}\n\
                 HINT: Check file permissions, or exclude the file with -x.",
                path.display(),
                io_err
            )
        }
        ArchiveError::CreateDestination { path, source: io_err } => {
            anyhow!(
                "Cannot create archive '{}': {}\n\
                 HINT: Check that the output directory exists and is writable.",
                path.display(),
                io_err
            )
        }
        ArchiveError::EmptyExclusionFragment { index } => {
            anyhow!(
                "Exclusion #{} is empty and would exclude every file\n\
                 HINT: Remove the empty -x argument.",
                index + 1
            )
        }
        ArchiveError::Finalize(reason) => {
            anyhow!(
                "Failed to finish the archive of '{}': {}\n\
                 HINT: The output file is incomplete and should be deleted.",
                source.display(),
                reason
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error archiving '{}'", source.display())),
    }
}

/// Adds context to a library result about the directory being archived
pub fn add_source_context<T>(result: Result<T, ArchiveError>, source: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, source))
}
