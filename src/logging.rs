//! Structured logging with tracing

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter directive: {0}")]
    Filter(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level; the format switch
/// selects JSON (production) or human-readable output.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| LoggingError::Filter(e.to_string()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}
