//! Test doubles and server harness helpers

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum_test::TestServer;

use trivy_gateway::Config;
use trivy_gateway::application::use_cases::ScanImageUseCase;
use trivy_gateway::domain::errors::ScanError;
use trivy_gateway::domain::scanner::ImageScanner;
use trivy_gateway::domain::value_objects::{ImageReference, RawReport, ScanBudget, ScanOptions};
use trivy_gateway::presentation::controllers::AppState;
use trivy_gateway::presentation::routes::create_router;

/// What the stub scanner should do when invoked.
pub enum StubOutcome {
    Report(&'static str),
    Fail(fn() -> ScanError),
}

/// Deterministic stand-in for the Trivy executor. Records how often it was
/// invoked so tests can assert the validator short-circuits before execution.
pub struct StubScanner {
    outcome: StubOutcome,
    calls: AtomicUsize,
}

impl StubScanner {
    pub fn returning(report: &'static str) -> Arc<Self> {
        Arc::new(Self {
            outcome: StubOutcome::Report(report),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: fn() -> ScanError) -> Arc<Self> {
        Arc::new(Self {
            outcome: StubOutcome::Fail(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageScanner for StubScanner {
    fn name(&self) -> &'static str {
        "Trivy"
    }

    fn version(&self) -> Option<String> {
        Some("Version: 0.55.0".to_string())
    }

    async fn scan(
        &self,
        _image: &ImageReference,
        _options: &ScanOptions,
        _budget: &ScanBudget,
    ) -> Result<RawReport, ScanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            StubOutcome::Report(report) => Ok(RawReport::new(report.to_string())),
            StubOutcome::Fail(error) => Err(error()),
        }
    }
}

/// Build a test server around a stub scanner and the given configuration.
pub fn test_server(scanner: Arc<dyn ImageScanner>, config: Config) -> TestServer {
    let config = Arc::new(config);
    let scan_use_case = Arc::new(ScanImageUseCase::new(scanner, config.scanner.budget()));
    let state = AppState {
        scan_use_case,
        config: config.clone(),
    };
    TestServer::new(create_router(state, &config)).expect("test server")
}

/// Default test configuration: docs off, no API-key enforcement.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.enable_docs = false;
    config
}

/// Test configuration with API-key enforcement enabled.
pub fn api_key_config(key: &str) -> Config {
    let mut config = test_config();
    config.auth.require_api_key = true;
    config.auth.api_key = Some(key.to_string());
    config
}
