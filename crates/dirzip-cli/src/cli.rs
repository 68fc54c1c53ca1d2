//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirzip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a directory into a zip archive
    Zip(ZipArgs),
    /// Build the theme resources and landing page archives
    Theme(ThemeArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Zip(_) => "zip",
            Self::Theme(_) => "theme",
            Self::Completion { .. } => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct ZipArgs {
    /// Directory to archive
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Prefix for the derived archive name (PREFIX_dir-name.zip)
    #[arg(short, long, default_value = "archive")]
    pub prefix: String,

    /// Output archive path (overrides the derived name)
    #[arg(short, long, value_name = "OUTPUT", conflicts_with = "prefix")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub options: ArchiveOptions,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ThemeArgs {
    /// Prefix for both archive names
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Site directory containing resources/theme/default and landing
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Directory to write the archives to (default: current directory)
    #[arg(short = 'C', long = "output-dir", value_name = "OUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub options: ArchiveOptions,

    /// Overwrite output files if they exist
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Options shared by every command that builds archives.
#[derive(clap::Args)]
pub struct ArchiveOptions {
    /// Leave out files whose name contains FRAGMENT (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "FRAGMENT")]
    pub exclude: Vec<String>,

    /// Do not apply the default exclusions (.DS_Store, .zip, .conf)
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Maximum single file size in bytes
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Read buffer size in bytes
    #[arg(long, value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,

    /// Deflate entries at this level (1-9) instead of storing them
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let size = parse_byte_size(s)?;
    if size == 0 {
        return Err("chunk size must be at least 1 byte".to_string());
    }
    usize::try_from(size).map_err(|_| format!("chunk size too large: {s}"))
}
