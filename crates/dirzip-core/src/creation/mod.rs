//! Archive creation module.
//!
//! This module turns a directory tree into a zip archive: the walker yields
//! entries, the filters decide what is kept and how it is named, and the
//! session streams each kept file into the archive.

pub mod filters;
pub mod walker;

pub mod builder;
pub mod config;
pub mod preset;
pub mod report;
pub mod session;

// Re-exports for public API
pub use builder::ArchiveBuilder;
pub use config::ArchiveConfig;
pub use config::DEFAULT_EXCLUSIONS;
pub use config::EntryMethod;
pub use preset::ThemeBundleReport;
pub use report::BuildReport;
pub use session::ArchiveSession;
pub use session::BuildState;
pub use walker::EntryKind;
pub use walker::TreeWalker;
pub use walker::WalkEntry;
