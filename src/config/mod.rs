//! Configuration management

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliConfig, CliOverrides};
pub use file::{EnvConfig, FileConfig};
pub use parser::{
    create_default_config, find_default_config, parse_config_content, parse_config_file,
};
pub use settings::SettingsValidator;

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10 // Default priority
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
        }
    }

    /// Merge settings from a partial configuration
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if source.is_available() {
            match source.load() {
                Ok(partial) => Ok(self.merge(partial)),
                Err(e) => Err(e),
            }
        } else {
            Ok(self)
        }
    }

    /// Try to load from a source, ignoring if not available
    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if source.is_available() {
            match source.load() {
                Ok(partial) => self.merge(partial),
                Err(_) => self,
            }
        } else {
            self
        }
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from multiple sources with proper precedence:
/// defaults < config file < environment < command line
pub fn load_config(
    overrides: CliOverrides,
    config_path: Option<std::path::PathBuf>,
) -> Result<Settings> {
    let cli_config = CliConfig::new(overrides);

    let mut builder = ConfigBuilder::new();

    // Explicit config file must exist; default locations are optional
    match config_path {
        Some(path) => {
            let file_config = FileConfig::with_path(path);
            builder = builder.load_from(&file_config)?;
        }
        None => {
            if let Ok(Some(default_config)) = parser::find_default_config() {
                builder = builder.merge(default_config);
            }
        }
    }

    let env_config = EnvConfig::new("RIPPLE");
    builder = builder.try_load_from(&env_config);

    builder = builder.load_from(&cli_config)?;

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn test_builder_later_sources_win() {
        let first = PartialSettings {
            max_depth: Some(3),
            parallel: Some(true),
            ..PartialSettings::default()
        };
        let second = PartialSettings {
            max_depth: Some(7),
            ..PartialSettings::default()
        };

        let settings = ConfigBuilder::new()
            .merge(first)
            .merge(second)
            .build()
            .unwrap();

        assert_eq!(settings.max_depth, Some(7));
        assert!(settings.parallel);
    }

    #[test]
    fn test_cli_overrides_file_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("ripple.toml");
        std::fs::write(&config_path, "max_depth = 2\noutput_format = \"Csv\"\n").unwrap();

        let overrides = CliOverrides {
            output: Some(OutputFormat::Json),
            ..CliOverrides::default()
        };
        let settings = load_config(overrides, Some(config_path)).unwrap();

        assert_eq!(settings.max_depth, Some(2));
        assert_eq!(settings.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let result = load_config(
            CliOverrides::default(),
            Some(PathBuf::from("/no/such/ripple.toml")),
        );
        assert!(result.is_err());
    }
}
