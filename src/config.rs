use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::QUESTION_COUNT;
use crate::data::score::DEFAULT_MAX_ALLOWED_MISSING;
use crate::error::ConfigError;

/// Default age splitting the "younger" and "older" groups (strictly greater).
pub const DEFAULT_AGE_THRESHOLD: f64 = 40.0;

/// Environment variable naming a JSON config file for the viewer.
pub const CONFIG_ENV_VAR: &str = "SURVEY_PANDA_CONFIG";

/// Tunable pipeline parameters. Every field is optional in the JSON file.
///
/// ```json
/// { "max_allowed_missing": 1, "age_threshold": 40.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Scores are absent for records with more missing grades than this.
    pub max_allowed_missing: usize,
    /// Records with `age > age_threshold` fall in the older group.
    pub age_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_allowed_missing: DEFAULT_MAX_ALLOWED_MISSING,
            age_threshold: DEFAULT_AGE_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Config from `SURVEY_PANDA_CONFIG` if set, defaults otherwise.
    /// A broken config file is logged and ignored.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Using pipeline config {config:?}");
                config
            }
            Err(e) => {
                log::warn!("Ignoring {CONFIG_ENV_VAR}: {e}");
                Self::default()
            }
        }
    }

    /// Returns all validation errors at once (not just the first).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.max_allowed_missing > QUESTION_COUNT {
            errors.push(format!(
                "max_allowed_missing: must be at most {QUESTION_COUNT}, got {}",
                self.max_allowed_missing
            ));
        }
        if !self.age_threshold.is_finite() || self.age_threshold < 0.0 {
            errors.push(format!(
                "age_threshold: must be a non-negative number, got {}",
                self.age_threshold
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_allowed_missing, 1);
        assert_eq!(config.age_threshold, 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_allowed_missing": 2 }}"#).unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_allowed_missing, 2);
        assert_eq!(config.age_threshold, DEFAULT_AGE_THRESHOLD);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_missing": 2 }}"#).unwrap();

        let err = PipelineConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::from_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let config = PipelineConfig {
            max_allowed_missing: 9,
            age_threshold: -1.0,
        };
        match config.validate() {
            Err(ConfigError::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].contains("max_allowed_missing"));
                assert!(errors[1].contains("age_threshold"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
