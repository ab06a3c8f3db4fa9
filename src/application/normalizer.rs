//! Raw report normalization
//!
//! Turns the scanner's native JSON report into the canonical [`ScanReport`]:
//! one [`Vulnerability`] per raw finding, a deterministic ordering, and a
//! summary recomputed from the normalized list.

use chrono::Utc;

use crate::domain::entities::{ScanReport, Summary, Vulnerability};
use crate::domain::errors::ScanError;
use crate::domain::value_objects::{ImageReference, RawReport, Severity};
use crate::infrastructure::scanner::report::TrivyReport;

/// Longest description carried through to the response.
const MAX_DESCRIPTION_CHARS: usize = 500;

/// References carried through per finding.
const MAX_REFERENCES: usize = 3;

/// Normalizes raw scanner reports into the canonical response schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportNormalizer;

impl ReportNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse `raw` and assemble the final report for `image`.
    ///
    /// Fails with `ScanFailure` only when the report is structurally
    /// unparsable; individual findings with unmappable severities degrade to
    /// `UNKNOWN` instead of aborting the scan.
    pub fn normalize(
        &self,
        scanner: &'static str,
        scanner_version: Option<String>,
        image: &ImageReference,
        raw: &RawReport,
    ) -> Result<ScanReport, ScanError> {
        let report: TrivyReport = serde_json::from_str(raw.as_str())
            .map_err(|e| ScanError::ScanFailure(format!("unparsable scanner report: {}", e)))?;

        let mut vulnerabilities = Vec::new();
        for result in report.results {
            for finding in result.vulnerabilities {
                vulnerabilities.push(Vulnerability {
                    cve_id: finding.vulnerability_id,
                    package: finding.pkg_name,
                    installed_version: finding.installed_version,
                    severity: Severity::from_report(&finding.severity),
                    fixed_version: finding.fixed_version.filter(|v| !v.is_empty()),
                    description: finding.description.map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS)),
                    target: result.target.clone(),
                    references: finding
                        .references
                        .into_iter()
                        .take(MAX_REFERENCES)
                        .collect(),
                });
            }
        }

        // Severity declaration order makes this ascending sort produce
        // severity-descending output; the cve_id tie-break keeps two runs
        // over an equivalent report byte-identical.
        vulnerabilities.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.cve_id.cmp(&b.cve_id))
        });

        let summary = Summary::from_vulnerabilities(&vulnerabilities);

        Ok(ScanReport {
            scanner,
            scanner_version,
            image: image.clone(),
            scan_time: Utc::now(),
            vulnerabilities,
            summary,
        })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
