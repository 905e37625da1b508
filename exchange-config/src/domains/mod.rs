//! Domain-specific configuration modules

pub mod files;
pub mod logging;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Exchange file locations
    #[serde(default)]
    pub files: files::FileLayout,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl ExchangeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.files.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> ConfigResult<String> {
        serde_yaml::to_string(&Self::default()).map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_parses_back() {
        let sample = ExchangeConfig::generate_sample().unwrap();
        assert!(sample.contains("pythonInput.rced"));

        let parsed: ExchangeConfig = serde_yaml::from_str(&sample).unwrap();
        assert_eq!(parsed, ExchangeConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let yaml = r#"
files:
  working_dir: /srv/exchange
logging:
  level: debug
"#;
        let config: ExchangeConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.files.declared_outputs, "outputs.rceo");
        assert_eq!(config.logging.level, logging::LogLevel::Debug);
        assert_eq!(config.logging.format, logging::LogFormat::Text);
    }
}
