//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ScanBudget;

/// Application configuration, loaded once at startup and passed into the
/// service explicitly. Never ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub scanner: ScannerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose interactive API docs (Swagger UI). Should be false in
    /// hardened production.
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer. Must
    /// exceed the scanner timeout so scans are classified by the executor,
    /// not cut off mid-flight by the HTTP stack.
    pub request_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to allow any (development only).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_docs: true,
            request_timeout_seconds: 330,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// External scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Path to the Trivy executable (or "trivy" if in PATH)
    pub executable: String,
    /// Hard wall-clock limit for one scan, in seconds
    pub timeout_seconds: u64,
    /// Address-space ceiling for the scanner subprocess, in MB
    pub memory_ceiling_mb: u64,
    /// Registry pull credentials, opaque to the service and handed straight
    /// to the scanner subprocess
    pub registry_username: Option<String>,
    pub registry_password: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            executable: "trivy".to_string(),
            timeout_seconds: 300,
            memory_ceiling_mb: 2048,
            registry_username: None,
            registry_password: None,
        }
    }
}

impl ScannerConfig {
    /// The per-scan resource budget this configuration describes.
    pub fn budget(&self) -> ScanBudget {
        ScanBudget {
            timeout: Duration::from_secs(self.timeout_seconds),
            memory_ceiling_mb: self.memory_ceiling_mb,
        }
    }
}

/// API-key enforcement configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// When true, requests must present the configured key; normally the
    /// gateway in front of this service enforces this instead.
    pub require_api_key: bool,
    pub api_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.scanner.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("TRIVYGW").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
