//! Command implementations.

pub mod completion;
pub mod theme;
pub mod zip;

use crate::cli::ArchiveOptions;
use anyhow::Result;
use anyhow::bail;
use dirzip_core::ArchiveConfig;
use dirzip_core::EntryMethod;
use std::path::Path;

/// Builds the library configuration from command-line options.
pub fn archive_config(options: &ArchiveOptions) -> ArchiveConfig {
    let mut config = ArchiveConfig::default().with_follow_symlinks(options.follow_symlinks);

    if options.no_default_excludes {
        config = config.with_exclusions(Vec::<String>::new());
    }
    for fragment in &options.exclude {
        config = config.exclude(fragment.as_str());
    }
    if let Some(max) = options.max_file_size {
        config = config.with_max_file_size(max);
    }
    if let Some(chunk) = options.chunk_size {
        config = config.with_chunk_size(chunk);
    }
    if let Some(level) = options.compression_level {
        config = config.with_method(EntryMethod::Deflated { level });
    }

    config
}

/// Fails if `path` exists and overwriting was not requested.
fn check_overwrite(path: &Path, force: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if !force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use -f/--force to overwrite.",
            path.display()
        );
    }
    Ok(true)
}
