//! Zip command implementation.

use super::archive_config;
use super::check_overwrite;
use crate::cli::ZipArgs;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use dirzip_core::build_archive;
use dirzip_core::build_archive_with_progress;
use dirzip_core::default_archive_name;
use std::path::PathBuf;

pub fn execute(args: &ZipArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let output = output_path(args);
    if check_overwrite(&output, args.force)? {
        formatter.format_warning(&format!(
            "Overwriting existing archive {}",
            output.display()
        ));
    }

    let config = archive_config(&args.options);

    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new("Zipping");
        add_source_context(
            build_archive_with_progress(&args.dir, &output, &config, &mut progress),
            &args.dir,
        )?
    } else {
        add_source_context(build_archive(&args.dir, &output, &config), &args.dir)?
    };

    formatter.format_build_result(&output, &report)?;

    Ok(())
}

/// Uses `--output` when given, otherwise derives the name from the prefix
/// and the directory argument as typed.
fn output_path(args: &ZipArgs) -> PathBuf {
    args.output.clone().unwrap_or_else(|| {
        PathBuf::from(default_archive_name(
            &args.prefix,
            &args.dir.to_string_lossy(),
        ))
    })
}
