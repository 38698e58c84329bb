//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RippleError};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RippleError::ConfigNotFound {
            path: path.to_path_buf(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| RippleError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings =
        toml::from_str(content).map_err(|e| RippleError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(
    settings: &PartialSettings,
    path: P,
) -> Result<()> {
    let path = path.as_ref();

    if let Some(project_root) = &settings.project_root {
        if project_root.as_os_str().is_empty() {
            return Err(RippleError::config_error(format!(
                "Invalid empty project_root in config file: {}",
                path.display()
            )));
        }
    }

    for (field, patterns) in [
        ("include_patterns", &settings.include_patterns),
        ("exclude_patterns", &settings.exclude_patterns),
    ] {
        if let Some(patterns) = patterns {
            for pattern in patterns {
                if pattern.is_empty() {
                    return Err(RippleError::config_error(format!(
                        "Empty pattern in {} in config file: {}",
                        field,
                        path.display()
                    )));
                }
                glob::Pattern::new(pattern).map_err(|e| {
                    RippleError::config_error(format!(
                        "Invalid pattern '{}' in {} in config file: {}: {}",
                        pattern,
                        field,
                        path.display(),
                        e
                    ))
                })?;
            }
        }
    }

    if let Some(depth) = settings.max_depth {
        if depth == 0 {
            return Err(RippleError::config_error(format!(
                "Invalid max_depth 0 in config file: {}. Must be at least 1.",
                path.display()
            )));
        }
    }

    if let Some(batch_size) = settings.parse_batch_size {
        if batch_size == 0 {
            return Err(RippleError::config_error(format!(
                "Invalid parse_batch_size 0 in config file: {}. Must be at least 1.",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Find and load configuration from default locations
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    // Check current directory first
    let current_dir_config = PathBuf::from(".ripple.toml");
    if current_dir_config.exists() {
        return Ok(Some(parse_config_file(current_dir_config)?));
    }

    // Check user home directory next
    if let Some(home_dir) = dirs::home_dir() {
        let home_config = home_dir.join(".ripple.toml");
        if home_config.exists() {
            return Ok(Some(parse_config_file(home_config)?));
        }
    }

    // Check XDG config directory if available
    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("ripple").join("config.toml");
        if xdg_config.exists() {
            return Ok(Some(parse_config_file(xdg_config)?));
        }
    }

    Ok(None)
}

/// Write a commented default configuration file
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let content = r#"# Ripple configuration file
#
# Settings here are overridden by RIPPLE_* environment variables and
# command line flags.

# Project root to analyze
# project_root = "."

# Source files to include
# include_patterns = ["**/*.js", "**/*.mjs", "**/*.cjs", "**/*.jsx", "**/*.ts", "**/*.tsx"]

# Paths to skip while scanning
# exclude_patterns = ["**/node_modules/**", "**/.git/**", "**/dist/**", "**/build/**", "**/coverage/**"]

# Maximum directory depth to traverse
# max_depth = 10

# Follow symbolic links while scanning
# follow_links = false

# Parse files in parallel
# parallel = true

# Worker threads for the parse phase (defaults to the CPU count)
# threads = 8

# Files per parallel batch
# parse_batch_size = 64

# Output format: "Text", "Json", or "Csv"
# output_format = "Text"

# Write output here instead of stdout
# output_file = "report.txt"

# Colors and progress in terminal output
# use_colors = true
# show_progress = true

# Export the dependency graph in DOT format
# graph_output = "deps.dot"
"#;

    fs::write(path.as_ref(), content).map_err(|e| RippleError::ConfigRead {
        path: path.as_ref().to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })
}
