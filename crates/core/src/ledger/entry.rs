//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kopra_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId};

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit leg (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit leg (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

impl EntrySide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// One debit or credit leg of a journal entry.
///
/// Exactly one of `debit_amount`/`credit_amount` is non-zero. Lines are owned
/// by their entry and only ever removed by deleting an unapproved entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// The entry this line belongs to.
    pub journal_entry_id: JournalEntryId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit leg).
    pub debit_amount: Decimal,
    /// Credit amount (zero if this is a debit leg).
    pub credit_amount: Decimal,
}

impl JournalLine {
    /// Returns which side this line sits on.
    #[must_use]
    pub fn side(&self) -> EntrySide {
        if self.debit_amount > Decimal::ZERO {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        }
    }

    /// Returns the non-zero amount of this line.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit_amount.max(self.credit_amount)
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

/// One atomic financial event.
///
/// Immutable once approved; corrections are new offsetting entries, never
/// edits to history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Tenant this entry belongs to.
    pub tenant_id: TenantId,
    /// Business date of the transaction.
    pub transaction_date: NaiveDate,
    /// Description of the event.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// Whether the entry contributes to balances and reports.
    pub is_approved: bool,
    /// The entry this one reverses, if any.
    pub reversal_of: Option<JournalEntryId>,
    /// Sum of the debit legs.
    pub total_debit: Decimal,
    /// Sum of the credit legs.
    pub total_credit: Decimal,
    /// Instant the entry was recorded.
    pub created_at: DateTime<Utc>,
    /// The debit/credit legs.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Returns true if this entry reverses another entry.
    #[must_use]
    pub const fn is_reversal(&self) -> bool {
        self.reversal_of.is_some()
    }
}
