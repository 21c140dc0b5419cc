//! Tenant context: request resolution and cached authorization.

use std::sync::Arc;
use std::time::Duration;

use dashmap::{DashMap, DashSet};
use moka::sync::Cache;
use kopra_shared::config::TenantCacheConfig;
use kopra_shared::types::{TenantId, UserId};
use kopra_shared::StoreError;

use super::error::TenantError;
use super::types::Tenant;

/// Directory of tenants and their memberships.
pub trait TenantDirectory: Send + Sync {
    /// Looks up a tenant by its slug.
    fn tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError>;

    /// Looks up a tenant by id.
    fn tenant(&self, tenant_id: TenantId) -> Result<Option<Tenant>, StoreError>;

    /// Returns true if the user may act within the tenant.
    fn has_access(&self, user_id: UserId, tenant_id: TenantId) -> Result<bool, StoreError>;
}

/// Resolves which tenant an operation belongs to and validates that the
/// acting user may operate within it.
///
/// Authorization decisions are cached with a short TTL keyed by
/// `(user, tenant)`. An explicit access-revocation event must call
/// [`TenantContext::revoke`] so the cached grant dies immediately rather
/// than at TTL expiry.
pub struct TenantContext {
    directory: Arc<dyn TenantDirectory>,
    authorizations: Cache<(UserId, TenantId), bool>,
}

impl TenantContext {
    /// Creates a context over the given directory.
    #[must_use]
    pub fn new(directory: Arc<dyn TenantDirectory>, config: &TenantCacheConfig) -> Self {
        let authorizations = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.authorization_ttl_secs))
            .build();
        Self {
            directory,
            authorizations,
        }
    }

    /// Resolves a request slug to the active tenant it names.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown slugs and `Disabled` for soft-disabled
    /// tenants.
    pub fn resolve(&self, slug: &str) -> Result<TenantId, TenantError> {
        let tenant = self
            .directory
            .tenant_by_slug(slug)?
            .ok_or_else(|| TenantError::NotFound(slug.to_string()))?;
        if !tenant.is_active {
            return Err(TenantError::Disabled(tenant.id));
        }
        Ok(tenant.id)
    }

    /// Validates that the user may act within the tenant and returns the
    /// validated id for threading through the engine.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` — a hard stop, logged as a security event —
    /// when the user has no membership in the tenant.
    pub fn authorize(
        &self,
        user_id: UserId,
        tenant_id: TenantId,
    ) -> Result<TenantId, TenantError> {
        let key = (user_id, tenant_id);
        let allowed = match self.authorizations.get(&key) {
            Some(cached) => cached,
            None => {
                let allowed = self.directory.has_access(user_id, tenant_id)?;
                self.authorizations.insert(key, allowed);
                allowed
            }
        };

        if allowed {
            Ok(tenant_id)
        } else {
            tracing::warn!(
                user_id = %user_id,
                tenant_id = %tenant_id,
                "denied access to tenant"
            );
            Err(TenantError::AccessDenied { user_id, tenant_id })
        }
    }

    /// Drops the cached authorization for `(user, tenant)`.
    ///
    /// Must be called on every explicit access-revocation event.
    pub fn revoke(&self, user_id: UserId, tenant_id: TenantId) {
        self.authorizations.invalidate(&(user_id, tenant_id));
        self.authorizations.run_pending_tasks();
    }
}

/// In-memory tenant directory for tests and embedded use.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    tenants: DashMap<TenantId, Tenant>,
    memberships: DashSet<(UserId, TenantId)>,
}

impl InMemoryTenantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a tenant.
    pub fn register_tenant(&self, tenant: Tenant) {
        self.tenants.insert(tenant.id, tenant);
    }

    /// Soft-disables or re-enables a tenant.
    pub fn set_tenant_active(&self, tenant_id: TenantId, is_active: bool) {
        if let Some(mut tenant) = self.tenants.get_mut(&tenant_id) {
            tenant.is_active = is_active;
        }
    }

    /// Grants a user membership in a tenant.
    pub fn grant_access(&self, user_id: UserId, tenant_id: TenantId) {
        self.memberships.insert((user_id, tenant_id));
    }

    /// Removes a user's membership in a tenant.
    pub fn revoke_access(&self, user_id: UserId, tenant_id: TenantId) {
        self.memberships.remove(&(user_id, tenant_id));
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self
            .tenants
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.clone()))
    }

    fn tenant(&self, tenant_id: TenantId) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tenants.get(&tenant_id).map(|t| t.clone()))
    }

    fn has_access(&self, user_id: UserId, tenant_id: TenantId) -> Result<bool, StoreError> {
        Ok(self.memberships.contains(&(user_id, tenant_id)))
    }
}
