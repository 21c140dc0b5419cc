//! The ledger service: posting, approval, reversal, and balance reads.
//!
//! The ledger is the only component permitted to mutate financial state.
//! Every write is validated against the balance invariant before anything
//! reaches the store, and every read is filtered by the tenant the caller
//! was authorized for.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use kopra_shared::config::LedgerConfig;
use kopra_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId};
use kopra_shared::{Clock, StoreError, SystemClock};

use crate::account::{Account, AccountCategory, BalanceRow};

use super::entry::{EntrySide, JournalEntry, JournalLine};
use super::error::LedgerError;
use super::store::{LedgerStore, PostedEntryListener};
use super::types::{BalanceFilter, EntryInput, ReportPeriod};
use super::validation::validate_lines;

/// Tenant-isolated double-entry ledger.
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
    listeners: RwLock<Vec<Arc<dyn PostedEntryListener>>>,
}

impl Ledger {
    /// Creates a ledger over the given store with the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Creates a ledger with an explicit clock.
    #[must_use]
    pub fn with_clock(
        store: Arc<dyn LedgerStore>,
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            config,
            clock,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns the configured balance tolerance.
    #[must_use]
    pub fn balance_tolerance(&self) -> Decimal {
        self.config.balance_tolerance
    }

    /// Registers a listener notified for every accepted posting.
    pub fn subscribe(&self, listener: Arc<dyn PostedEntryListener>) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(listener);
        }
    }

    /// Posts a balanced entry to the ledger.
    ///
    /// All-or-nothing: validation happens before any write, and the store
    /// inserts the entry and its lines as one unit.
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedEntry` (nothing written), a validation error, a
    /// `TenantMismatch` for accounts outside the tenant, or a storage error.
    pub fn post(
        &self,
        tenant_id: TenantId,
        input: EntryInput,
    ) -> Result<JournalEntryId, LedgerError> {
        let entry = self.post_internal(tenant_id, input, true, None)?;
        Ok(entry.id)
    }

    /// Records a draft entry. Drafts never contribute to balances or reports.
    pub fn post_draft(
        &self,
        tenant_id: TenantId,
        input: EntryInput,
    ) -> Result<JournalEntryId, LedgerError> {
        let entry = self.post_internal(tenant_id, input, false, None)?;
        Ok(entry.id)
    }

    /// Approves a draft entry, making it visible to balances and reports.
    pub fn approve(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<(), LedgerError> {
        let entry = self.entry(tenant_id, entry_id)?;
        if entry.is_approved {
            return Err(LedgerError::AlreadyApproved(entry_id));
        }
        let approved = self
            .store
            .approve_entry(tenant_id, entry_id)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        self.notify(tenant_id, &approved);
        Ok(())
    }

    /// Deletes a draft entry, cascading its lines.
    pub fn delete_draft(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<(), LedgerError> {
        let entry = self.entry(tenant_id, entry_id)?;
        if entry.is_approved {
            return Err(LedgerError::CannotDeleteApproved(entry_id));
        }
        if self.store.remove_entry(tenant_id, entry_id)? {
            Ok(())
        } else {
            Err(LedgerError::EntryNotFound(entry_id))
        }
    }

    /// Reverses a posted entry with a new offsetting entry.
    ///
    /// Debits and credits are swapped; history is never deleted. The new
    /// entry records which entry it reverses.
    pub fn reverse(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
        reason: &str,
    ) -> Result<JournalEntryId, LedgerError> {
        let original = self.entry(tenant_id, entry_id)?;
        if !original.is_approved {
            return Err(LedgerError::NotApproved(entry_id));
        }

        let lines = original
            .lines
            .iter()
            .map(|line| super::types::LineInput {
                account_id: line.account_id,
                side: line.side().opposite(),
                amount: line.amount(),
            })
            .collect();
        let input = EntryInput {
            transaction_date: self.clock.now().date_naive(),
            description: format!("Reversal of entry {}: {reason}", original.id),
            reference: original.reference.clone(),
            lines,
        };

        let reversal = self.post_internal(tenant_id, input, true, Some(entry_id))?;
        Ok(reversal.id)
    }

    /// Fetches an entry scoped to the tenant.
    pub fn entry(
        &self,
        tenant_id: TenantId,
        entry_id: JournalEntryId,
    ) -> Result<JournalEntry, LedgerError> {
        self.store
            .entry(tenant_id, entry_id)?
            .ok_or(LedgerError::EntryNotFound(entry_id))
    }

    /// Fetches an account strictly scoped to the tenant.
    ///
    /// A reference to another tenant's account is an isolation violation.
    pub fn account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, LedgerError> {
        let account = self
            .store
            .account(account_id)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        if account.tenant_id != tenant_id {
            tracing::warn!(
                tenant_id = %tenant_id,
                account_id = %account_id,
                "attempt to read an account outside the active tenant"
            );
            return Err(LedgerError::TenantMismatch { account_id });
        }
        Ok(account)
    }

    /// Fetches an account if the tenant owns it, `None` otherwise.
    pub fn find_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .store
            .account(account_id)?
            .filter(|account| account.tenant_id == tenant_id))
    }

    /// Computes signed balances for the given accounts as of a date.
    ///
    /// One aggregation pass in the store, grouped by account; accounts with
    /// no postings map to zero. The sign follows the category's normal side.
    pub fn balances_as_of(
        &self,
        tenant_id: TenantId,
        account_ids: &[AccountId],
        as_of: NaiveDate,
    ) -> Result<HashMap<AccountId, Decimal>, LedgerError> {
        let filter = BalanceFilter {
            account_ids: Some(account_ids.to_vec()),
            categories: None,
            period: ReportPeriod::AsOf(as_of),
        };
        let totals = self.store.balance_totals(tenant_id, &filter)?;

        let mut balances: HashMap<AccountId, Decimal> = account_ids
            .iter()
            .map(|id| (*id, Decimal::ZERO))
            .collect();
        for row in totals {
            balances.insert(row.account.id, row.signed_balance());
        }
        Ok(balances)
    }

    /// Returns signed per-account balance rows for the given categories, the
    /// report-facing read path.
    pub fn balance_rows(
        &self,
        tenant_id: TenantId,
        categories: &[AccountCategory],
        period: ReportPeriod,
    ) -> Result<Vec<BalanceRow>, LedgerError> {
        let filter = BalanceFilter {
            account_ids: None,
            categories: Some(categories.to_vec()),
            period,
        };
        let rows = self
            .store
            .balance_totals(tenant_id, &filter)?
            .into_iter()
            .map(|row| {
                let balance = row.signed_balance();
                BalanceRow {
                    account_id: row.account.id,
                    code: row.account.code,
                    name: row.account.name,
                    category: row.account.category,
                    parent_id: row.account.parent_id,
                    level: row.account.level,
                    balance,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Sums the debit legs posted to an account since the given instant.
    pub fn debit_total_since(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        cutoff: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        Ok(self.store.debit_total_since(tenant_id, account_id, cutoff)?)
    }

    /// Counts the tenant's entries.
    pub fn entry_count(&self, tenant_id: TenantId) -> Result<usize, LedgerError> {
        Ok(self.store.entry_count(tenant_id)?)
    }

    fn post_internal(
        &self,
        tenant_id: TenantId,
        input: EntryInput,
        is_approved: bool,
        reversal_of: Option<JournalEntryId>,
    ) -> Result<JournalEntry, LedgerError> {
        let totals = match validate_lines(&input.lines, self.config.balance_tolerance) {
            Ok(totals) => totals,
            Err(err) => {
                if err.is_invariant_violation() {
                    tracing::error!(
                        tenant_id = %tenant_id,
                        description = %input.description,
                        lines = input.lines.len(),
                        error = %err,
                        "rejected unbalanced journal entry"
                    );
                }
                return Err(err);
            }
        };

        for line in &input.lines {
            let account = self
                .store
                .account(line.account_id)?
                .ok_or(LedgerError::AccountNotFound(line.account_id))?;
            if account.tenant_id != tenant_id {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    account_id = %line.account_id,
                    "journal line references an account outside the active tenant"
                );
                return Err(LedgerError::TenantMismatch {
                    account_id: line.account_id,
                });
            }
            if !account.is_active {
                return Err(LedgerError::AccountInactive(line.account_id));
            }
        }

        let entry_id = JournalEntryId::new();
        let lines: Vec<JournalLine> = input
            .lines
            .iter()
            .map(|line| {
                let (debit_amount, credit_amount) = match line.side {
                    EntrySide::Debit => (line.amount, Decimal::ZERO),
                    EntrySide::Credit => (Decimal::ZERO, line.amount),
                };
                JournalLine {
                    id: JournalLineId::new(),
                    journal_entry_id: entry_id,
                    account_id: line.account_id,
                    debit_amount,
                    credit_amount,
                }
            })
            .collect();

        let entry = JournalEntry {
            id: entry_id,
            tenant_id,
            transaction_date: input.transaction_date,
            description: input.description,
            reference: input.reference,
            is_approved,
            reversal_of,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            created_at: self.clock.now(),
            lines,
        };

        self.store.insert_entry(entry.clone())?;
        tracing::debug!(
            tenant_id = %tenant_id,
            entry_id = %entry.id,
            total = %entry.total_debit,
            approved = is_approved,
            "journal entry recorded"
        );

        if is_approved {
            self.notify(tenant_id, &entry);
        }
        Ok(entry)
    }

    fn notify(&self, tenant_id: TenantId, entry: &JournalEntry) {
        if let Ok(listeners) = self.listeners.read() {
            for listener in listeners.iter() {
                listener.entry_posted(tenant_id, entry);
            }
        }
    }
}
