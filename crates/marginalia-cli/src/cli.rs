//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Marginalia - Export Kindle highlights and notes from My Clippings.txt.
#[derive(Debug, Parser)]
#[command(name = "marginalia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MARGINALIA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export highlights and notes of one or all books
    Export(ExportArgs),

    /// List the books found in a clippings file
    Books(BooksArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the export command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Path to My Clippings.txt
    pub input: PathBuf,

    /// Export format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the export to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export only the book with this exact title
    #[arg(short, long, conflicts_with = "all")]
    pub book: Option<String>,

    /// Export every book without asking
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the books command.
#[derive(Debug, Args)]
pub struct BooksArgs {
    /// Path to My Clippings.txt
    pub input: PathBuf,

    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    /// Headings per category
    Markdown,
    /// Bulleted list per book
    Bullet,
    /// Original clippings blocks
    Default,
}

impl From<FormatArg> for crate::config::ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Markdown => crate::config::ExportFormat::Markdown,
            FormatArg::Bullet => crate::config::ExportFormat::Bullet,
            FormatArg::Default => crate::config::ExportFormat::Default,
        }
    }
}
