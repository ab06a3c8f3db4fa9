//! Scan domain entities

use chrono::{DateTime, Utc};

use super::value_objects::{ImageReference, Severity};

/// One normalized vulnerability finding.
///
/// Findings are unique by (cve_id, package) within a report in practice, but
/// duplicates are preserved as reported: the same pair can legitimately occur
/// against different package instances in different image layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vulnerability {
    pub cve_id: String,
    pub package: String,
    pub installed_version: String,
    pub severity: Severity,
    pub fixed_version: Option<String>,
    /// Description text, truncated by the normalizer.
    pub description: Option<String>,
    /// The scanner result target this finding came from (OS package set,
    /// a language lockfile, ...).
    pub target: Option<String>,
    pub references: Vec<String>,
}

/// Severity breakdown derived from the normalized vulnerability list.
///
/// Invariant: `total` counts every finding, including `Unknown` severity;
/// `Unknown` has no visible bucket, so `total >= critical + high + medium + low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Summary {
    /// Compute the breakdown from the finding list. Counts are never taken
    /// from the raw report.
    pub fn from_vulnerabilities(vulnerabilities: &[Vulnerability]) -> Self {
        let mut summary = Self {
            total: vulnerabilities.len(),
            ..Self::default()
        };
        for vulnerability in vulnerabilities {
            match vulnerability.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Unknown => {}
            }
        }
        summary
    }
}

/// Result of one completed scan.
///
/// Exists only for the duration of one request/response cycle; nothing is
/// persisted between invocations.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Name of the scanning engine that produced the findings.
    pub scanner: &'static str,
    pub scanner_version: Option<String>,
    pub image: ImageReference,
    /// Scan completion instant.
    pub scan_time: DateTime<Utc>,
    /// Sorted severity-descending, then cve_id ascending.
    pub vulnerabilities: Vec<Vulnerability>,
    pub summary: Summary,
}
