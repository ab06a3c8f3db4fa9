//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::validator::ScanPayload;
use crate::domain::entities::{ScanReport, Summary, Vulnerability};
use crate::domain::value_objects::Severity;

/// Request model for a synchronous image scan
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequestDto {
    /// Container image reference: `[registry[:port]/]repo[:tag|@digest]`
    #[schema(example = "nginx:latest")]
    pub image: String,

    /// Optional comma-separated severity filter forwarded to the scanner
    #[schema(example = "CRITICAL,HIGH")]
    pub severity: Option<String>,

    /// Drop findings with no fixed version yet
    #[schema(example = false, default = false)]
    #[serde(default)]
    pub ignore_unfixed: bool,
}

impl ScanRequestDto {
    pub fn into_payload(self) -> ScanPayload {
        ScanPayload {
            image: self.image,
            severity: self.severity,
            ignore_unfixed: self.ignore_unfixed,
        }
    }
}

/// Response model for a completed scan
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Name of the scanning engine
    #[schema(example = "Trivy")]
    pub scanner: String,

    /// Scanner version, when it could be determined at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Version: 0.55.0")]
    pub scanner_version: Option<String>,

    /// Canonicalized image reference that was scanned
    #[schema(example = "nginx:latest")]
    pub image: String,

    /// Scan completion instant (UTC)
    #[schema(example = "2025-08-05T10:30:00Z")]
    pub scan_time: DateTime<Utc>,

    /// Findings, severity-descending then CVE id ascending
    pub vulnerabilities: Vec<VulnerabilityDto>,

    /// Severity breakdown derived from the finding list
    pub summary: SummaryDto,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            scanner: report.scanner.to_string(),
            scanner_version: report.scanner_version,
            image: report.image.to_string(),
            scan_time: report.scan_time,
            vulnerabilities: report
                .vulnerabilities
                .into_iter()
                .map(VulnerabilityDto::from)
                .collect(),
            summary: SummaryDto::from(report.summary),
        }
    }
}

/// DTO for one vulnerability finding
#[derive(Debug, Serialize, ToSchema)]
pub struct VulnerabilityDto {
    /// Vulnerability identifier (CVE, GHSA, ...)
    #[schema(example = "CVE-2024-6387")]
    pub cve_id: String,

    /// Affected package name
    #[schema(example = "openssh-client")]
    pub package: String,

    /// Version found in the image
    #[schema(example = "1:9.2p1-2")]
    pub installed_version: String,

    /// Severity level
    pub severity: Severity,

    /// First version carrying the fix; null when no fix is available
    #[schema(example = "1:9.8p1-1")]
    pub fixed_version: Option<String>,

    /// Truncated description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The scanner result target this finding came from
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "nginx:latest (debian 12.5)")]
    pub target: Option<String>,

    /// Advisory links (capped)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl From<Vulnerability> for VulnerabilityDto {
    fn from(vulnerability: Vulnerability) -> Self {
        Self {
            cve_id: vulnerability.cve_id,
            package: vulnerability.package,
            installed_version: vulnerability.installed_version,
            severity: vulnerability.severity,
            fixed_version: vulnerability.fixed_version,
            description: vulnerability.description,
            target: vulnerability.target,
            references: vulnerability.references,
        }
    }
}

/// DTO for the severity breakdown
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryDto {
    /// Every finding, including UNKNOWN severity
    #[schema(example = 5)]
    pub total: usize,

    #[schema(example = 1)]
    pub critical: usize,

    #[schema(example = 2)]
    pub high: usize,

    #[schema(example = 1)]
    pub medium: usize,

    #[schema(example = 1)]
    pub low: usize,
}

impl From<Summary> for SummaryDto {
    fn from(summary: Summary) -> Self {
        Self {
            total: summary.total,
            critical: summary.critical,
            high: summary.high,
            medium: summary.medium,
            low: summary.low,
        }
    }
}

/// Error response envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error payload with a stable machine-readable kind
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// One of: InvalidImage, Unauthorized, ScanTimeout, RegistryUnreachable,
    /// ScanFailure, InternalError
    #[schema(example = "InvalidImage")]
    pub kind: String,

    /// Human-readable message
    #[schema(example = "invalid image reference: image reference must not be empty")]
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service health status
    #[schema(example = "healthy")]
    pub status: String,

    /// Current service version
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Health check timestamp
    pub timestamp: DateTime<Utc>,
}
