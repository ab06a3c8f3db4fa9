//! Application setup and wiring

use std::sync::Arc;

use axum::Router;

use crate::application::use_cases::ScanImageUseCase;
use crate::config::Config;
use crate::domain::scanner::ImageScanner;
use crate::infrastructure::scanner::TrivyExecutor;
use crate::presentation::controllers::AppState;
use crate::presentation::routes::create_router;

/// Create the application router with the real Trivy executor wired in.
pub async fn create_app(config: Config) -> Result<Router, Box<dyn std::error::Error + Send + Sync>> {
    let config = Arc::new(config);

    let executor = TrivyExecutor::new(config.scanner.clone())
        .probe_version()
        .await;
    let scanner: Arc<dyn ImageScanner> = Arc::new(executor);

    tracing::info!(
        scanner = scanner.name(),
        version = scanner.version().as_deref().unwrap_or("unknown"),
        timeout_secs = config.scanner.timeout_seconds,
        memory_ceiling_mb = config.scanner.memory_ceiling_mb,
        "Scanner configured"
    );

    let scan_use_case = Arc::new(ScanImageUseCase::new(scanner, config.scanner.budget()));

    let state = AppState {
        scan_use_case,
        config: config.clone(),
    };

    Ok(create_router(state, &config))
}
