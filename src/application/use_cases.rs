//! Scan orchestration use case

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::normalizer::ReportNormalizer;
use crate::application::validator::{self, ScanPayload};
use crate::domain::entities::ScanReport;
use crate::domain::errors::ScanError;
use crate::domain::scanner::ImageScanner;
use crate::domain::value_objects::ScanBudget;

/// Orchestrates one scan request: validate, execute, normalize.
///
/// Each stage either advances the pipeline or terminates it with a classified
/// error; every execution ends in exactly one of the two. No retries happen
/// here: retry policy belongs to the caller, informed by the error kind.
pub struct ScanImageUseCase {
    scanner: Arc<dyn ImageScanner>,
    normalizer: ReportNormalizer,
    budget: ScanBudget,
}

impl ScanImageUseCase {
    pub fn new(scanner: Arc<dyn ImageScanner>, budget: ScanBudget) -> Self {
        Self {
            scanner,
            normalizer: ReportNormalizer::new(),
            budget,
        }
    }

    #[instrument(skip(self, payload), fields(image = %payload.image))]
    pub async fn execute(&self, payload: ScanPayload) -> Result<ScanReport, ScanError> {
        let request = validator::validate(payload)?;

        let raw = self
            .scanner
            .scan(&request.image, &request.options, &self.budget)
            .await?;

        let report = self.normalizer.normalize(
            self.scanner.name(),
            self.scanner.version(),
            &request.image,
            &raw,
        )?;

        info!(
            image = %report.image,
            total = report.summary.total,
            critical = report.summary.critical,
            "Scan completed"
        );
        Ok(report)
    }
}
