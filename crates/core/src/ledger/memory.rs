//! In-memory reference implementation of the ledger storage port.
//!
//! Accounts live in one map keyed by id (each carries its owning tenant);
//! journal entries are partitioned per tenant in a `DashMap` so writes for
//! different tenants land on different shards and never contend on a shared
//! lock. Appending an entry places it and all of its lines in the shard in
//! one step, which gives the all-or-nothing posting guarantee.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use kopra_shared::types::{AccountId, JournalEntryId, TenantId};
use kopra_shared::StoreError;

use crate::account::Account;

use super::entry::JournalEntry;
use super::store::LedgerStore;
use super::types::{AccountTotals, BalanceFilter};

/// In-memory ledger store for tests and embedded use.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: DashMap<AccountId, Account>,
    entries: DashMap<TenantId, Vec<JournalEntry>>,
}

impl InMemoryLedger {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an account in the chart.
    pub fn register_account(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Flips an account's active flag. Returns false if the account is
    /// unknown.
    pub fn set_account_active(&self, account_id: AccountId, is_active: bool) -> bool {
        match self.accounts.get_mut(&account_id) {
            Some(mut account) => {
                account.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

impl LedgerStore for InMemoryLedger {
    fn account(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&account_id).map(|a| a.clone()))
    }

    fn insert_entry(&self, entry: JournalEntry) -> Result<(), StoreError> {
        self.entries.entry(entry.tenant_id).or_default().push(entry);
        Ok(())
    }

    fn entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        Ok(self
            .entries
            .get(&tenant_id)
            .and_then(|shard| shard.iter().find(|e| e.id == entry_id).cloned()))
    }

    fn approve_entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let Some(mut shard) = self.entries.get_mut(&tenant_id) else {
            return Ok(None);
        };
        match shard.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.is_approved = true;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    fn remove_entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<bool, StoreError> {
        let Some(mut shard) = self.entries.get_mut(&tenant_id) else {
            return Ok(false);
        };
        let before = shard.len();
        shard.retain(|e| e.id != entry_id);
        Ok(shard.len() != before)
    }

    fn balance_totals(
        &self,
        tenant_id: TenantId,
        filter: &BalanceFilter,
    ) -> Result<Vec<AccountTotals>, StoreError> {
        let id_filter: Option<HashSet<AccountId>> = filter
            .account_ids
            .as_ref()
            .map(|ids| ids.iter().copied().collect());

        // One pass over the tenant's shard, grouped by account.
        let mut sums: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        if let Some(shard) = self.entries.get(&tenant_id) {
            for entry in shard
                .iter()
                .filter(|e| e.is_approved && filter.period.contains(e.transaction_date))
            {
                for line in &entry.lines {
                    if let Some(ids) = &id_filter {
                        if !ids.contains(&line.account_id) {
                            continue;
                        }
                    }
                    let slot = sums
                        .entry(line.account_id)
                        .or_insert((Decimal::ZERO, Decimal::ZERO));
                    slot.0 += line.debit_amount;
                    slot.1 += line.credit_amount;
                }
            }
        }

        let mut rows = Vec::with_capacity(sums.len());
        for (account_id, (total_debit, total_credit)) in sums {
            let Some(account) = self.accounts.get(&account_id).map(|a| a.clone()) else {
                return Err(StoreError::Corrupted(format!(
                    "journal line references unknown account {account_id}"
                )));
            };
            if account.tenant_id != tenant_id {
                return Err(StoreError::Corrupted(format!(
                    "journal line for tenant {tenant_id} references account {account_id} of another tenant"
                )));
            }
            if let Some(categories) = &filter.categories {
                if !categories.contains(&account.category) {
                    continue;
                }
            }
            rows.push(AccountTotals {
                account,
                total_debit,
                total_credit,
            });
        }
        rows.sort_by(|a, b| a.account.code.cmp(&b.account.code));
        Ok(rows)
    }

    fn debit_total_since(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Decimal, StoreError> {
        let mut total = Decimal::ZERO;
        if let Some(shard) = self.entries.get(&tenant_id) {
            for entry in shard
                .iter()
                .filter(|e| e.is_approved && e.created_at >= cutoff)
            {
                for line in entry.lines.iter().filter(|l| l.account_id == account_id) {
                    total += line.debit_amount;
                }
            }
        }
        Ok(total)
    }

    fn entry_count(&self, tenant_id: TenantId) -> Result<usize, StoreError> {
        Ok(self.entries.get(&tenant_id).map_or(0, |shard| shard.len()))
    }
}
