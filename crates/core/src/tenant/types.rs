//! Tenant domain types.

use serde::{Deserialize, Serialize};
use kopra_shared::types::TenantId;

/// An isolated cooperative organization, the unit of data partitioning.
///
/// Identity is immutable; a cooperative that shuts down is soft-disabled,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// URL-safe identifier used for request resolution.
    pub slug: String,
    /// Whether the cooperative is operational.
    pub is_active: bool,
}
