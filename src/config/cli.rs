//! Command line configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};

/// Flags from the command line that map onto settings.
///
/// Kept separate from the clap `Args` type so the config layer does
/// not depend on the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub path: Option<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub no_parallel: bool,
    pub threads: Option<usize>,
    pub output: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub no_colors: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub no_progress: bool,
    pub graph_output: Option<PathBuf>,
}

/// Command line configuration source (highest priority)
pub struct CliConfig {
    overrides: CliOverrides,
    name: String,
}

impl CliConfig {
    pub fn new(overrides: CliOverrides) -> Self {
        Self {
            overrides,
            name: "command line arguments".to_string(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let overrides = &self.overrides;
        let mut settings = PartialSettings::default();

        if let Some(path) = &overrides.path {
            settings.project_root = Some(path.clone());
        }
        if !overrides.include.is_empty() {
            settings.include_patterns = Some(overrides.include.clone());
        }
        if !overrides.exclude.is_empty() {
            settings.exclude_patterns = Some(overrides.exclude.clone());
        }
        if let Some(max_depth) = overrides.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if overrides.follow_links {
            settings.follow_links = Some(true);
        }
        if overrides.no_parallel {
            settings.parallel = Some(false);
        }
        if let Some(threads) = overrides.threads {
            settings.threads = Some(threads);
        }
        if let Some(output) = overrides.output {
            settings.output_format = Some(output);
        }
        if let Some(output_file) = &overrides.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if overrides.no_colors {
            settings.use_colors = Some(false);
        }
        if overrides.quiet {
            settings.quiet = Some(true);
        }
        if overrides.verbose {
            settings.verbose = Some(true);
        }
        if overrides.no_progress {
            settings.show_progress = Some(false);
        }
        if let Some(graph_output) = &overrides.graph_output {
            settings.graph_output = Some(graph_output.clone());
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        30 // CLI always wins
    }
}
