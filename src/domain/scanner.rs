//! Scanner capability interface

use async_trait::async_trait;

use super::errors::ScanError;
use super::value_objects::{ImageReference, RawReport, ScanBudget, ScanOptions};

/// Capability interface over the external scanning engine.
///
/// The engine is a black box: given an image reference it either produces a
/// raw report in its native format or fails with a classified error. Keeping
/// this behind a trait lets tests substitute a deterministic fake and keeps
/// the orchestration logic independent of the real scanner binary.
#[async_trait]
pub trait ImageScanner: Send + Sync {
    /// Engine name as surfaced in scan responses.
    fn name(&self) -> &'static str;

    /// Engine version, when it could be determined.
    fn version(&self) -> Option<String>;

    /// Scan one image within `budget`.
    ///
    /// Implementations must never block beyond `budget.timeout`, must
    /// terminate the underlying scan process on expiry, and must reclaim any
    /// ephemeral storage on every exit path.
    async fn scan(
        &self,
        image: &ImageReference,
        options: &ScanOptions,
        budget: &ScanBudget,
    ) -> Result<RawReport, ScanError>;
}
