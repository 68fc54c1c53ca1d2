//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use dirzip_core::BuildReport;
use dirzip_core::ThemeBundleReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_heading(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    fn write_report(&self, report: &BuildReport) {
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Directories:      {}",
            Self::format_number(report.directories_visited)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_size)
        ));

        if report.files_skipped() > 0 {
            let _ = self.term.write_line(&format!(
                "  Files skipped:    {}",
                Self::format_number(report.files_skipped())
            ));
            if self.verbose {
                let _ = self.term.write_line(&format!(
                    "    excluded: {}, empty: {}, not regular: {}, destination: {}",
                    report.files_excluded,
                    report.files_skipped_empty,
                    report.entries_skipped_other,
                    report.files_skipped_destination
                ));
            }
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
            for entry in &report.entries {
                let _ = self.term.write_line(&format!("    {entry}"));
            }
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.term.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.term.write_line(&format!("  - {warning}"));
            }
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_build_result(&self, output_path: &Path, report: &BuildReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_heading(&format!("Archive created: {}", output_path.display()));
        let _ = self.term.write_line("");
        self.write_report(report);

        Ok(())
    }

    fn format_theme_result(&self, report: &ThemeBundleReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_heading(&format!(
            "Archive created: {}",
            report.resources_archive.display()
        ));
        self.write_report(&report.resources);
        self.write_heading(&format!(
            "Archive created: {}",
            report.content_archive.display()
        ));
        self.write_report(&report.content);

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
