//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use dirzip_core::BuildReport;
use dirzip_core::ThemeBundleReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct BuildOutput {
    output_path: String,
    files_added: usize,
    directories_visited: usize,
    files_excluded: usize,
    files_skipped_empty: usize,
    entries_skipped_other: usize,
    files_skipped_destination: usize,
    bytes_written: u64,
    archive_size: u64,
    compression_ratio: f64,
    duration_ms: u128,
    entries: Vec<String>,
    warnings: Vec<String>,
}

impl BuildOutput {
    fn new(output_path: &Path, report: &BuildReport) -> Self {
        Self {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            directories_visited: report.directories_visited,
            files_excluded: report.files_excluded,
            files_skipped_empty: report.files_skipped_empty,
            entries_skipped_other: report.entries_skipped_other,
            files_skipped_destination: report.files_skipped_destination,
            bytes_written: report.bytes_written,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
            entries: report.entries.clone(),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_build_result(&self, output_path: &Path, report: &BuildReport) -> Result<()> {
        let output = JsonOutput::success("zip", BuildOutput::new(output_path, report));
        Self::output(&output)
    }

    fn format_theme_result(&self, report: &ThemeBundleReport) -> Result<()> {
        #[derive(Serialize)]
        struct ThemeOutput {
            resources: BuildOutput,
            content: BuildOutput,
        }

        let data = ThemeOutput {
            resources: BuildOutput::new(&report.resources_archive, &report.resources),
            content: BuildOutput::new(&report.content_archive, &report.content),
        };

        let output = JsonOutput::success("theme", data);
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
