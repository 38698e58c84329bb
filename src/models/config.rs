//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for Ripple
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Project root to analyze
    pub project_root: PathBuf,

    /// Glob patterns for source files to include
    pub include_patterns: Vec<String>,

    /// Glob patterns for paths to exclude from scanning
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to traverse
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links during directory traversal
    pub follow_links: bool,

    /// Whether to parse files in parallel
    pub parallel: bool,

    /// Worker threads for the parse phase (defaults to the CPU count)
    pub threads: Option<usize>,

    /// Files per batch in the parallel parse phase; cancellation is
    /// checked between batches
    pub parse_batch_size: usize,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to show progress bars
    pub show_progress: bool,

    /// Export the dependency graph in DOT format to this path
    pub graph_output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            include_patterns: vec![
                "**/*.js".to_string(),
                "**/*.mjs".to_string(),
                "**/*.cjs".to_string(),
                "**/*.jsx".to_string(),
                "**/*.ts".to_string(),
                "**/*.tsx".to_string(),
            ],
            exclude_patterns: vec![
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
                "**/dist/**".to_string(),
                "**/build/**".to_string(),
                "**/coverage/**".to_string(),
            ],
            max_depth: None,
            follow_links: false,
            parallel: true,
            threads: None,
            parse_batch_size: 64,
            output_format: OutputFormat::Text,
            output_file: None,
            use_colors: true,
            quiet: false,
            verbose: false,
            show_progress: true,
            graph_output: None,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV edge list for spreadsheet analysis or external renderers
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub project_root: Option<PathBuf>,
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub follow_links: Option<bool>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub parse_batch_size: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub use_colors: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub show_progress: Option<bool>,
    pub graph_output: Option<PathBuf>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.project_root.is_some() {
            self.project_root = other.project_root;
        }
        if other.include_patterns.is_some() {
            self.include_patterns = other.include_patterns;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.follow_links.is_some() {
            self.follow_links = other.follow_links;
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.threads.is_some() {
            self.threads = other.threads;
        }
        if other.parse_batch_size.is_some() {
            self.parse_batch_size = other.parse_batch_size;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
        if other.graph_output.is_some() {
            self.graph_output = other.graph_output;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(project_root) = &self.project_root {
            settings.project_root = project_root.clone();
        }
        if let Some(include_patterns) = &self.include_patterns {
            settings.include_patterns = include_patterns.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(follow_links) = self.follow_links {
            settings.follow_links = follow_links;
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        if let Some(parse_batch_size) = self.parse_batch_size {
            settings.parse_batch_size = parse_batch_size;
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }
        if let Some(graph_output) = &self.graph_output {
            settings.graph_output = Some(graph_output.clone());
        }

        settings
    }
}
