//! Trivy report parsing types
//!
//! These types match the JSON output format of the Trivy CLI
//! (`trivy image --format json`). Only the fields the normalizer consumes are
//! modeled; everything else in the report is ignored.

use serde::Deserialize;

/// Root Trivy JSON report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrivyReport {
    /// Report schema version
    #[serde(default)]
    pub schema_version: Option<u32>,
    /// The scanned artifact (image reference as Trivy resolved it)
    #[serde(default)]
    pub artifact_name: Option<String>,
    /// Per-target result groups; absent entirely for clean images
    #[serde(default)]
    pub results: Vec<TrivyResult>,
}

/// One result group (OS package set, language lockfile, ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrivyResult {
    /// Human-readable target description
    #[serde(default)]
    pub target: Option<String>,
    /// Result class (`os-pkgs`, `lang-pkgs`, ...)
    #[serde(default)]
    pub class: Option<String>,
    /// Findings for this target; Trivy omits the key when there are none
    #[serde(default)]
    pub vulnerabilities: Vec<TrivyVulnerability>,
}

/// A single Trivy finding
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrivyVulnerability {
    /// Vulnerability identifier (CVE, GHSA, ...)
    #[serde(rename = "VulnerabilityID")]
    pub vulnerability_id: String,
    /// Affected package name
    #[serde(default)]
    pub pkg_name: String,
    /// Version found in the image
    #[serde(default)]
    pub installed_version: String,
    /// First version carrying the fix, if any
    #[serde(default)]
    pub fixed_version: Option<String>,
    /// Severity string as assessed by the scanner's data sources
    #[serde(default)]
    pub severity: String,
    /// Short title
    #[serde(default)]
    pub title: Option<String>,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
    /// Advisory links
    #[serde(default)]
    pub references: Vec<String>,
}
