//! Inbound request validation

use crate::domain::errors::ScanError;
use crate::domain::value_objects::{ImageReference, ScanOptions, ScanRequest, SeverityFilter};

/// Raw scan request fields as received over the wire, before validation.
#[derive(Debug, Clone)]
pub struct ScanPayload {
    pub image: String,
    pub severity: Option<String>,
    pub ignore_unfixed: bool,
}

/// Validate and canonicalize one inbound payload.
///
/// Pure function of its input; no scan work happens here, so a rejected
/// request has no side effects. API-key enforcement runs in middleware before
/// the payload ever reaches this point.
pub fn validate(payload: ScanPayload) -> Result<ScanRequest, ScanError> {
    let image = ImageReference::parse(&payload.image)?;
    let severity_filter = payload
        .severity
        .as_deref()
        .map(SeverityFilter::parse)
        .transpose()?;

    Ok(ScanRequest {
        image,
        options: ScanOptions {
            severity_filter,
            ignore_unfixed: payload.ignore_unfixed,
        },
    })
}
