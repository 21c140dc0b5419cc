//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;
use kopra_shared::types::{AccountId, JournalEntryId};
use kopra_shared::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry has no lines.
    #[error("Entry must have at least one line")]
    NoLines,

    /// Entry has only one side (all debits or all credits).
    #[error("Entry must have both debit and credit lines")]
    SingleSided,

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    // ========== Invariant Violations ==========
    /// Entry is not balanced (debits != credits beyond tolerance).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== Isolation Violations ==========
    /// Account does not belong to the tenant the operation is scoped to.
    #[error("Account {account_id} does not belong to the active tenant")]
    TenantMismatch {
        /// The account the caller referenced.
        account_id: AccountId,
    },

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry is already approved.
    #[error("Journal entry {0} is already approved")]
    AlreadyApproved(JournalEntryId),

    /// Operation requires an approved entry.
    #[error("Journal entry {0} is not approved")]
    NotApproved(JournalEntryId),

    /// Approved entries cannot be deleted.
    #[error("Journal entry {0} is approved and cannot be deleted")]
    CannotDeleteApproved(JournalEntryId),

    // ========== Storage Errors ==========
    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::SingleSided => "SINGLE_SIDED",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::TenantMismatch { .. } => "TENANT_MISMATCH",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyApproved(_) => "ALREADY_APPROVED",
            Self::NotApproved(_) => "NOT_APPROVED",
            Self::CannotDeleteApproved(_) => "CANNOT_DELETE_APPROVED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if this error indicates corrupted input or state rather
    /// than a correctable request.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::UnbalancedEntry { .. })
    }

    /// Returns true if this error is a tenant-isolation violation and should
    /// be logged as a security-relevant event.
    #[must_use]
    pub const fn is_isolation_violation(&self) -> bool {
        matches!(self, Self::TenantMismatch { .. })
    }
}
