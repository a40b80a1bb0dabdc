//! Error type returned by every store operation.

use std::time::Duration;

/// Failure of a store operation, classified by kind.
///
/// "Not found" is not an error: lookups return `Ok(None)` and deletes return
/// `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An insert hit a unique constraint.
    #[error("unique constraint violation on {constraint}")]
    UniquenessViolation { constraint: String },

    /// The backend rejected the operation or could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not finish within the configured bound.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, Self::UniquenessViolation { .. })
    }
}
