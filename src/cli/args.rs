//! Command-line argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ripple - refactoring-impact analyzer for JavaScript/TypeScript projects
#[derive(Parser, Debug)]
#[command(name = "ripple")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analyze the impact of a refactor before applying it")]
#[command(
    long_about = "Ripple builds the import graph of a JavaScript/TypeScript project and \
answers what a proposed refactor would break: which files are affected, whether the change \
touches import cycles, how risky it is, and exactly which lines would be edited. Nothing is \
ever written to the analyzed sources."
)]
#[command(after_help = "EXAMPLES:

Preview a symbol rename:
    ripple rename --module src/utils --symbol parse --to parseDocument

Preview moving a module:
    ripple move --module src/utils --to src/common/utils

Preview splitting a module (every symbol needs a destination):
    ripple split --module src/big --assign parse=src/parsing --assign fmt=src/formatting

Inspect the dependency graph only:
    ripple graph --path ./my-project --output json

Write a DOT file for rendering:
    ripple graph --graph-output deps.dot

Create a default configuration file:
    ripple init
")]
pub struct Args {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Project root to analyze (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Glob patterns for source files to include (repeatable)
    #[arg(long, global = true, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Glob patterns to exclude from scanning (repeatable)
    #[arg(short, long, global = true, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Maximum directory depth to traverse
    #[arg(long, global = true, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links during directory traversal
    #[arg(long, global = true)]
    pub follow_links: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// File to write output to (stdout if not specified)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Configuration file path (defaults to .ripple.toml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable parallel parsing
    #[arg(long, global = true)]
    pub no_parallel: bool,

    /// Worker threads for the parse phase
    #[arg(long, global = true, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Export the dependency graph in DOT format to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub graph_output: Option<PathBuf>,
}

/// Subcommands: each one describes a refactor operation, plus graph
/// inspection and config bootstrap
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Preview renaming a top-level symbol
    Rename {
        /// Module that defines the symbol (project-relative, no extension)
        #[arg(long, value_name = "MODULE")]
        module: String,

        /// Current symbol name
        #[arg(long = "symbol", value_name = "NAME")]
        old_symbol: String,

        /// New symbol name
        #[arg(long = "to", value_name = "NAME")]
        new_symbol: String,
    },
    /// Preview moving a module to a new location
    Move {
        /// Module to move (project-relative, no extension)
        #[arg(long, value_name = "MODULE")]
        module: String,

        /// New location (project-relative, no extension)
        #[arg(long = "to", value_name = "MODULE")]
        new_location: String,
    },
    /// Preview splitting a module's symbols across new modules
    Split {
        /// Module to split (project-relative, no extension)
        #[arg(long, value_name = "MODULE")]
        module: String,

        /// Symbol assignment, repeatable: --assign symbol=new/module
        #[arg(long = "assign", value_name = "SYMBOL=MODULE", value_parser = parse_assignment, required = true)]
        assignments: Vec<(String, String)>,
    },
    /// Build and report the dependency graph without an operation
    Graph,
    /// Create a default configuration file (.ripple.toml)
    Init,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV edge list for spreadsheets or external renderers
    Csv,
}

impl From<OutputFormat> for crate::models::config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => crate::models::config::OutputFormat::Text,
            OutputFormat::Json => crate::models::config::OutputFormat::Json,
            OutputFormat::Csv => crate::models::config::OutputFormat::Csv,
        }
    }
}

/// Parse a `symbol=destination/module` assignment
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((symbol, destination)) if !symbol.is_empty() && !destination.is_empty() => {
            Ok((symbol.trim().to_string(), destination.trim().to_string()))
        }
        _ => Err(format!(
            "invalid assignment '{}', expected symbol=new/module",
            s
        )),
    }
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
