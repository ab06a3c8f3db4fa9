//! Configuration validation module

use crate::config::{AuthConfig, ScannerConfig, ServerConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Scanner configuration error: {message}")]
    Scanner { message: String },

    #[error("Authentication configuration error: {message}")]
    Auth { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn scanner(message: impl Into<String>) -> Self {
        Self::Scanner {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty".to_string()));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for ScannerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.executable.trim().is_empty() {
            return Err(ValidationError::scanner(
                "Scanner executable path cannot be empty".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ValidationError::scanner(
                "Scan timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.memory_ceiling_mb == 0 {
            return Err(ValidationError::scanner(
                "Memory ceiling must be greater than 0 MB".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.require_api_key
            && self
                .api_key
                .as_deref()
                .map(str::trim)
                .is_none_or(str::is_empty)
        {
            return Err(ValidationError::auth(
                "api_key must be set when require_api_key is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_validation() {
        let valid = ServerConfig::default();
        assert!(valid.validate().is_ok());

        let invalid = ServerConfig {
            port: 0,
            ..valid.clone()
        };
        assert!(invalid.validate().is_err());

        let invalid = ServerConfig {
            request_timeout_seconds: 0,
            ..valid.clone()
        };
        assert!(invalid.validate().is_err());

        let invalid = ServerConfig {
            host: String::new(),
            ..valid
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_scanner_config_validation() {
        let valid = ScannerConfig::default();
        assert!(valid.validate().is_ok());

        let invalid = ScannerConfig {
            executable: "  ".to_string(),
            ..valid.clone()
        };
        assert!(invalid.validate().is_err());

        let invalid = ScannerConfig {
            timeout_seconds: 0,
            ..valid.clone()
        };
        assert!(invalid.validate().is_err());

        let invalid = ScannerConfig {
            memory_ceiling_mb: 0,
            ..valid
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_auth_config_validation() {
        assert!(AuthConfig::default().validate().is_ok());

        let enforced_without_key = AuthConfig {
            require_api_key: true,
            api_key: None,
        };
        assert!(enforced_without_key.validate().is_err());

        let enforced_with_blank_key = AuthConfig {
            require_api_key: true,
            api_key: Some("   ".to_string()),
        };
        assert!(enforced_with_blank_key.validate().is_err());

        let enforced_with_key = AuthConfig {
            require_api_key: true,
            api_key: Some("secret-key".to_string()),
        };
        assert!(enforced_with_key.validate().is_ok());
    }
}
