//! Theme bundle command implementation.

use super::archive_config;
use super::check_overwrite;
use crate::cli::ThemeArgs;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use dirzip_core::build_theme_bundle;
use dirzip_core::build_theme_bundle_with_progress;
use dirzip_core::creation::preset::THEME_CONTENT_SUFFIX;
use dirzip_core::creation::preset::THEME_RESOURCES_SUFFIX;
use std::env;

pub fn execute(
    args: &ThemeArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    for suffix in [THEME_RESOURCES_SUFFIX, THEME_CONTENT_SUFFIX] {
        let path = output_dir.join(format!("{}_{suffix}.zip", args.prefix));
        if check_overwrite(&path, args.force)? {
            formatter.format_warning(&format!("Overwriting existing archive {}", path.display()));
        }
    }

    let config = archive_config(&args.options);

    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new("Bundling");
        add_source_context(
            build_theme_bundle_with_progress(
                &args.prefix,
                &args.dir,
                &output_dir,
                &config,
                &mut progress,
            ),
            &args.dir,
        )?
    } else {
        add_source_context(
            build_theme_bundle(&args.prefix, &args.dir, &output_dir, &config),
            &args.dir,
        )?
    };

    formatter.format_theme_result(&report)?;

    Ok(())
}
