//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate that a file name is a bare name, not a path
pub fn validate_file_name(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(value, field_name, domain)?;

    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be a plain file name, got '{}'", field_name, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert!(validate_required_string("value", "field", "files").is_ok());
        assert!(validate_required_string("", "field", "files").is_err());
        assert!(validate_required_string("   ", "field", "files").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("outputs.rceo", "declared_outputs", "files").is_ok());
        assert!(validate_file_name("nested/outputs.rceo", "declared_outputs", "files").is_err());
        assert!(validate_file_name("..", "declared_outputs", "files").is_err());

        match validate_file_name("a\\b", "declared_outputs", "files") {
            Err(ConfigError::DomainError { domain, message }) => {
                assert_eq!(domain, "files");
                assert!(message.contains("declared_outputs"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
