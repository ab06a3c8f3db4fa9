//! Scan domain value objects

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::ScanError;

/// Characters permitted in an image reference.
///
/// Letters, digits, `.`, `-`, `_`, `/`, `:` and `@` cover registry hosts
/// (with ports), repository paths, tags and digests.
fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/' | ':' | '@')
}

/// A validated, canonicalized container image reference.
///
/// The canonical form always carries an explicit tag or digest: a bare
/// repository like `nginx` normalizes to `nginx:latest`. Immutable once
/// constructed; created only through [`ImageReference::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    /// Validate `raw` against the reference grammar and canonicalize it.
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScanError::InvalidImage(
                "image reference must not be empty".to_string(),
            ));
        }
        if let Some(bad) = raw.chars().find(|c| !is_reference_char(*c)) {
            return Err(ScanError::InvalidImage(format!(
                "image reference contains disallowed character {:?}",
                bad
            )));
        }

        // Split off a digest first: everything after '@' is opaque to us but
        // must be present and unique.
        let (name, digest) = match raw.split_once('@') {
            Some((name, digest)) => {
                if digest.is_empty() || digest.contains('@') {
                    return Err(ScanError::InvalidImage(format!(
                        "malformed digest in image reference '{}'",
                        raw
                    )));
                }
                (name, Some(digest))
            }
            None => (raw, None),
        };

        if name.is_empty() || name.starts_with('/') || name.ends_with('/') {
            return Err(ScanError::InvalidImage(format!(
                "malformed repository path in image reference '{}'",
                raw
            )));
        }

        // A tag is a ':' occurring after the last '/' (a ':' before that is a
        // registry port, e.g. registry.example.com:5000/app).
        let last_segment = name.rsplit('/').next().unwrap_or(name);
        let tag = last_segment.split_once(':').map(|(_, tag)| tag);
        if let Some(tag) = tag {
            if tag.is_empty() || tag.contains(':') {
                return Err(ScanError::InvalidImage(format!(
                    "malformed tag in image reference '{}'",
                    raw
                )));
            }
        }

        let canonical = if digest.is_some() || tag.is_some() {
            raw.to_string()
        } else {
            format!("{}:latest", raw)
        };
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vulnerability severity level.
///
/// Declaration order is the sort order: `Critical` compares lowest so an
/// ascending sort yields severity-descending output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Lenient mapping for severity strings in raw scanner reports.
    ///
    /// Unmappable values become `Unknown` instead of failing the report; a
    /// single malformed finding must never abort a whole scan.
    pub fn from_report(raw: &str) -> Self {
        Self::from_str(raw).unwrap_or(Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Self::Critical),
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict severity filter forwarded to the scanner (`--severity`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityFilter(Vec<Severity>);

impl SeverityFilter {
    /// Parse a comma-separated severity list, e.g. `"CRITICAL,HIGH"`.
    ///
    /// Unlike [`Severity::from_report`], unknown values here are a request
    /// validation failure, not something to paper over.
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let mut levels = Vec::new();
        for part in raw.split(',') {
            let level = Severity::from_str(part).map_err(|()| {
                ScanError::InvalidImage(format!(
                    "invalid severity filter value '{}'; expected CRITICAL, HIGH, MEDIUM, LOW or UNKNOWN",
                    part.trim()
                ))
            })?;
            if !levels.contains(&level) {
                levels.push(level);
            }
        }
        if levels.is_empty() {
            return Err(ScanError::InvalidImage(
                "severity filter must not be empty".to_string(),
            ));
        }
        Ok(Self(levels))
    }

    pub fn levels(&self) -> &[Severity] {
        &self.0
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Severity::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

/// Per-request scanner options.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Restrict reported findings to these severities (scanner-side filter).
    pub severity_filter: Option<SeverityFilter>,
    /// Drop findings that have no fixed version yet.
    pub ignore_unfixed: bool,
}

/// Resource budget bounding one scan execution.
#[derive(Debug, Clone, Copy)]
pub struct ScanBudget {
    /// Hard wall-clock limit; the scanner subprocess is killed on expiry.
    pub timeout: Duration,
    /// Address-space ceiling applied to the scanner subprocess.
    pub memory_ceiling_mb: u64,
}

/// Validated scan request, passed by value through the pipeline.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub image: ImageReference,
    pub options: ScanOptions,
}

/// Scanner-native report output, unparsed.
#[derive(Debug, Clone)]
pub struct RawReport(String);

impl RawReport {
    pub fn new(body: String) -> Self {
        Self(body)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
