//! Tenant error types.

use thiserror::Error;
use kopra_shared::types::{TenantId, UserId};
use kopra_shared::StoreError;

/// Errors that can occur while resolving or authorizing a tenant.
#[derive(Debug, Clone, Error)]
pub enum TenantError {
    /// No tenant matches the requested slug.
    #[error("Tenant not found: {0}")]
    NotFound(String),

    /// The tenant exists but has been soft-disabled.
    #[error("Tenant {0} is disabled")]
    Disabled(TenantId),

    /// The user may not act within the tenant. Always a hard stop, never
    /// downgraded to an empty result.
    #[error("User {user_id} is not authorized for tenant {tenant_id}")]
    AccessDenied {
        /// The user that was denied.
        user_id: UserId,
        /// The tenant the user attempted to act in.
        tenant_id: TenantId,
    },

    /// The directory lookup failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TenantError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TENANT_NOT_FOUND",
            Self::Disabled(_) => "TENANT_DISABLED",
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
