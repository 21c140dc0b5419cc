//! Per-tenant report memoization.
//!
//! Cached reports are a best-effort accelerator, never a source of truth.
//! Invalidation is driven by the posting event the ledger emits, and it is
//! conservative: any accepted entry drops every cached report for that
//! tenant rather than risking a stale, unbalanced-looking report.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use moka::sync::Cache;
use kopra_shared::config::ReportCacheConfig;
use kopra_shared::types::TenantId;

use crate::ledger::{JournalEntry, PostedEntryListener};

use super::error::ReportError;
use super::service::ReportAssembler;
use super::types::{BalanceSheet, IncomeStatement};

/// The caches for one tenant. Partitioned per tenant so invalidation for one
/// cooperative never touches another's entries.
#[derive(Clone)]
struct TenantReportCaches {
    balance_sheets: Cache<NaiveDate, BalanceSheet>,
    income_statements: Cache<(NaiveDate, NaiveDate), IncomeStatement>,
}

/// Memoizing front for the report assembler.
pub struct ReportCache {
    assembler: Arc<ReportAssembler>,
    tenants: DashMap<TenantId, TenantReportCaches>,
    ttl: Duration,
    max_per_tenant: u64,
}

impl ReportCache {
    /// Creates a cache over the given assembler.
    #[must_use]
    pub fn new(assembler: Arc<ReportAssembler>, config: &ReportCacheConfig) -> Self {
        Self {
            assembler,
            tenants: DashMap::new(),
            ttl: Duration::from_secs(config.ttl_secs),
            max_per_tenant: config.max_reports_per_tenant,
        }
    }

    /// Returns the balance sheet for the tenant, memoized per as-of date.
    ///
    /// Concurrent misses for the same key collapse to a single build.
    ///
    /// # Errors
    ///
    /// Propagates the assembler's error; failures are never cached.
    pub fn balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheet, ReportError> {
        let caches = self.caches_for(tenant_id);
        caches
            .balance_sheets
            .try_get_with(as_of, || self.assembler.balance_sheet(tenant_id, as_of))
            .map_err(|err| (*err).clone())
    }

    /// Returns the income statement for the tenant, memoized per period.
    ///
    /// # Errors
    ///
    /// Propagates the assembler's error; failures are never cached.
    pub fn income_statement(
        &self,
        tenant_id: TenantId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<IncomeStatement, ReportError> {
        let caches = self.caches_for(tenant_id);
        caches
            .income_statements
            .try_get_with((period_start, period_end), || {
                self.assembler
                    .income_statement(tenant_id, period_start, period_end)
            })
            .map_err(|err| (*err).clone())
    }

    /// Drops every cached report for the tenant.
    pub fn invalidate_tenant(&self, tenant_id: TenantId) {
        if let Some(caches) = self.tenants.get(&tenant_id) {
            caches.balance_sheets.invalidate_all();
            caches.income_statements.invalidate_all();
        }
    }

    /// Counts the tenant's cached reports across both report types.
    #[must_use]
    pub fn cached_report_count(&self, tenant_id: TenantId) -> u64 {
        self.tenants.get(&tenant_id).map_or(0, |caches| {
            caches.balance_sheets.run_pending_tasks();
            caches.income_statements.run_pending_tasks();
            caches.balance_sheets.entry_count() + caches.income_statements.entry_count()
        })
    }

    fn caches_for(&self, tenant_id: TenantId) -> TenantReportCaches {
        self.tenants
            .entry(tenant_id)
            .or_insert_with(|| TenantReportCaches {
                balance_sheets: Cache::builder()
                    .max_capacity(self.max_per_tenant)
                    .time_to_live(self.ttl)
                    .build(),
                income_statements: Cache::builder()
                    .max_capacity(self.max_per_tenant)
                    .time_to_live(self.ttl)
                    .build(),
            })
            .clone()
    }
}

impl PostedEntryListener for ReportCache {
    fn entry_posted(&self, tenant_id: TenantId, entry: &JournalEntry) {
        tracing::debug!(
            tenant_id = %tenant_id,
            entry_id = %entry.id,
            "invalidating cached reports after posting"
        );
        self.invalidate_tenant(tenant_id);
    }
}
