//! Settings validation

use crate::error::{Result, RippleError};
use crate::models::config::Settings;

/// Validates a fully merged `Settings` before analysis starts
pub struct SettingsValidator;

impl SettingsValidator {
    /// Check the settings for problems the engine cannot work around
    pub fn validate(settings: &Settings) -> Result<()> {
        if settings.project_root.as_os_str().is_empty() {
            return Err(RippleError::config_error("project_root must not be empty"));
        }

        if settings.include_patterns.is_empty() {
            return Err(RippleError::config_error(
                "include_patterns must contain at least one pattern",
            ));
        }

        for pattern in settings
            .include_patterns
            .iter()
            .chain(settings.exclude_patterns.iter())
        {
            glob::Pattern::new(pattern).map_err(|e| {
                RippleError::config_error(format!("invalid glob pattern '{}': {}", pattern, e))
            })?;
        }

        if settings.parse_batch_size == 0 {
            return Err(RippleError::config_error(
                "parse_batch_size must be at least 1",
            ));
        }

        if let Some(0) = settings.threads {
            return Err(RippleError::config_error("threads must be at least 1"));
        }

        if let Some(0) = settings.max_depth {
            return Err(RippleError::config_error("max_depth must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SettingsValidator::validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_empty_includes_rejected() {
        let settings = Settings {
            include_patterns: Vec::new(),
            ..Settings::default()
        };
        assert!(SettingsValidator::validate(&settings).is_err());
    }

    #[test]
    fn test_bad_glob_rejected() {
        let settings = Settings {
            exclude_patterns: vec!["[invalid".to_string()],
            ..Settings::default()
        };
        assert!(SettingsValidator::validate(&settings).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let settings = Settings {
            threads: Some(0),
            ..Settings::default()
        };
        assert!(SettingsValidator::validate(&settings).is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let settings = Settings {
            parse_batch_size: 0,
            ..Settings::default()
        };
        assert!(SettingsValidator::validate(&settings).is_err());
    }
}
