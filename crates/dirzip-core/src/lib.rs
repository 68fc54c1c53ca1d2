//! Streaming directory-to-zip archiving.
//!
//! `dirzip-core` walks a directory tree, drops empty files and files whose
//! name contains an excluded fragment, and streams every remaining regular
//! file into a zip archive in fixed-size chunks with a per-file size limit.
//! Memory use is bounded by one chunk buffer regardless of file size.
//!
//! # Examples
//!
//! ```no_run
//! use dirzip_core::ArchiveConfig;
//! use dirzip_core::build_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::default().exclude(".log");
//! let report = build_archive("./site", "site.zip", &config)?;
//! println!("Archived {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod copy;
pub mod creation;
pub mod error;
pub mod progress;

#[cfg(test)]
mod test_utils;

// Re-export main API types
pub use api::build_archive;
pub use api::build_archive_with_progress;
pub use copy::ChunkedCopier;
pub use copy::CopyError;
pub use creation::ArchiveBuilder;
pub use creation::ArchiveConfig;
pub use creation::BuildReport;
pub use creation::BuildState;
pub use creation::EntryMethod;
pub use creation::ThemeBundleReport;
pub use creation::preset::build_theme_bundle;
pub use creation::preset::build_theme_bundle_with_progress;
pub use creation::preset::default_archive_name;
pub use error::ArchiveError;
pub use error::ErrorKind;
pub use error::Result;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use progress::SkipReason;
