//! Hierarchy error types.

use thiserror::Error;
use kopra_shared::types::AccountId;
use kopra_shared::StoreError;

/// Errors raised while reconstructing an account hierarchy.
#[derive(Debug, Clone, Error)]
pub enum HierarchyError {
    /// The parent chain loops back on itself.
    #[error("Malformed account hierarchy: cycle through account {0}")]
    CycleDetected(AccountId),

    /// Fetching a balance-less ancestor failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl HierarchyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CycleDetected(_) => "MALFORMED_HIERARCHY",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
