//! Stderr backend for the `log` records emitted by dirzip-core.

use console::Term;
use console::style;
use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && metadata.target().starts_with("dirzip")
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), &record.args().to_string());
        let _ = Term::stderr().write_line(&line);
    }

    fn flush(&self) {
        let _ = Term::stderr().flush();
    }
}

/// Installs the stderr logger.
///
/// Library records are shown only with `--verbose`.
pub fn init(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_filter(verbose));
    }
}

fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    }
}

fn format_record(level: Level, message: &str) -> String {
    let tag = match level {
        Level::Error => style("error").red().for_stderr(),
        Level::Warn => style("warn").yellow().for_stderr(),
        Level::Info => style("info").green().for_stderr(),
        Level::Debug | Level::Trace => style("debug").dim().for_stderr(),
    };
    format!("{tag}: {message}")
}
