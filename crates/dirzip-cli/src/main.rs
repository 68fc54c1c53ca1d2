//! dirzip CLI - Command-line utility for packing directories into zip
//! archives.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::Commands;
use output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            formatter.format_error(cli.command.name(), &e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    // Progress bars would interleave with machine-readable output and log lines.
    let show_progress = !cli.quiet && !cli.json && !cli.verbose;

    match &cli.command {
        Commands::Zip(args) => commands::zip::execute(args, formatter, show_progress),
        Commands::Theme(args) => commands::theme::execute(args, formatter, show_progress),
        Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    }
}
