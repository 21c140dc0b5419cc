//! Storage port for the ledger.
//!
//! The engine owns all business rules; implementations of this trait own
//! atomicity and tenant partitioning. `insert_entry` must write the entry
//! and all of its lines as one unit so no reader ever observes a partially
//! posted entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use kopra_shared::types::{AccountId, JournalEntryId, TenantId};
use kopra_shared::StoreError;

use crate::account::Account;

use super::entry::JournalEntry;
use super::types::{AccountTotals, BalanceFilter};

/// Receives an event for every entry accepted into the ledger.
///
/// Subscribers are notified after the write commits; the report cache uses
/// this to invalidate memoized reports.
pub trait PostedEntryListener: Send + Sync {
    /// Called once per approved entry accepted for `tenant_id`.
    fn entry_posted(&self, tenant_id: TenantId, entry: &JournalEntry);
}

/// Storage operations the ledger requires from its backing store.
///
/// All read methods that take a `TenantId` must filter by it; tenant
/// isolation is enforced by data partitioning, never by a shared lock.
pub trait LedgerStore: Send + Sync {
    /// Fetches an account header by id, regardless of tenant.
    ///
    /// The ledger compares the owner tenant itself so that cross-tenant
    /// references can be reported as isolation violations.
    fn account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Atomically writes an entry and all of its lines.
    fn insert_entry(&self, entry: JournalEntry) -> Result<(), StoreError>;

    /// Fetches an entry scoped to the tenant.
    fn entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Marks a draft entry approved and returns the updated entry.
    fn approve_entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Removes an entry and its lines. Returns true if something was removed.
    fn remove_entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<bool, StoreError>;

    /// Aggregates per-account debit/credit totals in a single pass over the
    /// tenant's approved entries.
    fn balance_totals(
        &self,
        tenant_id: TenantId,
        filter: &BalanceFilter,
    ) -> Result<Vec<AccountTotals>, StoreError>;

    /// Sums the debit legs posted to an account since the given instant.
    fn debit_total_since(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Decimal, StoreError>;

    /// Counts the tenant's entries (approved and draft).
    fn entry_count(&self, tenant_id: TenantId) -> Result<usize, StoreError>;
}
