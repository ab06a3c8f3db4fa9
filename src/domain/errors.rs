//! Scan pipeline error taxonomy

/// Terminal error for one scan request.
///
/// Every pipeline failure is classified into exactly one kind; none of them
/// triggers an internal retry. `RegistryUnreachable` is the only kind a
/// caller can usefully retry, which is why registry pull failures are kept
/// distinct from scanner-logic failures.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The request payload or image reference failed validation.
    #[error("invalid image reference: {0}")]
    InvalidImage(String),

    /// API-key enforcement is enabled and the request carried no valid credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The scanner did not complete within the configured wall-clock budget.
    #[error("scan timed out after {0} seconds")]
    ScanTimeout(u64),

    /// The image could not be pulled from its registry (network or auth failure
    /// at the registry boundary).
    #[error("registry unreachable: {0}")]
    RegistryUnreachable(String),

    /// The scanner ran but failed: crash, corrupt image, memory exhaustion, or
    /// a structurally unparsable report.
    #[error("scan failed: {0}")]
    ScanFailure(String),

    /// Unanticipated fault: misconfiguration, scanner executable missing, I/O
    /// errors outside the registry boundary.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ScanError {
    /// Stable machine-readable kind string carried in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidImage(_) => "InvalidImage",
            Self::Unauthorized(_) => "Unauthorized",
            Self::ScanTimeout(_) => "ScanTimeout",
            Self::RegistryUnreachable(_) => "RegistryUnreachable",
            Self::ScanFailure(_) => "ScanFailure",
            Self::InternalError(_) => "InternalError",
        }
    }
}
