//! Savings error types.
//!
//! Everything here except `Internal` and the wrapped ledger/storage failures
//! is user-recoverable: returned as a typed result, never aborting the
//! request pipeline.

use rust_decimal::Decimal;
use thiserror::Error;
use kopra_shared::types::MemberId;
use kopra_shared::StoreError;

use crate::ledger::LedgerError;

/// Errors that can occur while processing a savings movement.
#[derive(Debug, Error)]
pub enum SavingsError {
    // ========== Validation Errors ==========
    /// The savings type name is not one of the four known categories.
    #[error("Invalid savings type: {0}")]
    InvalidSavingsType(String),

    /// Member not found in this tenant.
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// Member is not active.
    #[error("Member {0} is not active")]
    InactiveMember(MemberId),

    /// Movement amount must be positive.
    #[error("Movement amount must be positive")]
    NonPositiveAmount,

    /// Movement amount exceeds the absolute ceiling.
    #[error("Amount {amount} exceeds the movement ceiling of {ceiling}")]
    AmountAboveCeiling {
        /// The requested amount.
        amount: Decimal,
        /// The configured ceiling.
        ceiling: Decimal,
    },

    // ========== Business-Rule Rejections ==========
    /// The member's balance does not cover the withdrawal.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// The balance available for withdrawal.
        available: Decimal,
        /// The requested amount.
        requested: Decimal,
    },

    /// The rolling 24-hour withdrawal limit would be exceeded.
    #[error("Daily withdrawal limit of {limit} exceeded: {attempted} attempted in 24 hours")]
    DailyLimitExceeded {
        /// The configured limit for this savings type.
        limit: Decimal,
        /// Prior withdrawals plus the current request.
        attempted: Decimal,
    },

    /// Mandatory savings may only be withdrawn by terminated members with no
    /// outstanding loan.
    #[error("Mandatory savings are locked for member {0}")]
    MandatorySavingsLocked(MemberId),

    // ========== Configuration Errors ==========
    /// The chart of accounts has no mapping for this movement.
    #[error("Chart of accounts is not configured: {0}")]
    MissingAccountMapping(String),

    // ========== Internal Errors ==========
    /// The ledger rejected the movement.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The member directory or chart lookup failed.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// A defect in the guard itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SavingsError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSavingsType(_) => "INVALID_SAVINGS_TYPE",
            Self::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            Self::InactiveMember(_) => "INACTIVE_MEMBER",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountAboveCeiling { .. } => "AMOUNT_ABOVE_CEILING",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::DailyLimitExceeded { .. } => "DAILY_LIMIT_EXCEEDED",
            Self::MandatorySavingsLocked(_) => "MANDATORY_SAVINGS_LOCKED",
            Self::MissingAccountMapping(_) => "MISSING_ACCOUNT_MAPPING",
            Self::Ledger(err) => err.error_code(),
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for expected, user-facing rejections that must not be
    /// logged as errors.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::DailyLimitExceeded { .. }
                | Self::MandatorySavingsLocked(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rejections_are_classified() {
        assert!(SavingsError::InsufficientBalance {
            available: dec!(10),
            requested: dec!(20),
        }
        .is_rejection());
        assert!(SavingsError::DailyLimitExceeded {
            limit: dec!(100),
            attempted: dec!(101),
        }
        .is_rejection());
        assert!(SavingsError::MandatorySavingsLocked(MemberId::new()).is_rejection());
        assert!(!SavingsError::NonPositiveAmount.is_rejection());
        assert!(!SavingsError::Internal(String::new()).is_rejection());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SavingsError::InvalidSavingsType("arisan".into()).error_code(),
            "INVALID_SAVINGS_TYPE"
        );
        assert_eq!(
            SavingsError::DailyLimitExceeded {
                limit: dec!(100),
                attempted: dec!(101),
            }
            .error_code(),
            "DAILY_LIMIT_EXCEEDED"
        );
    }
}
