//! Ledger input and query types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kopra_shared::types::AccountId;

use crate::account::{Account, AccountCategory};

use super::entry::EntrySide;

/// Input for a single journal line.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit leg.
    pub side: EntrySide,
    /// The amount (must be positive).
    pub amount: Decimal,
}

impl LineInput {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            side: EntrySide::Debit,
            amount,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            side: EntrySide::Credit,
            amount,
        }
    }
}

/// Input for posting a journal entry.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Business date of the transaction.
    pub transaction_date: NaiveDate,
    /// Description of the event.
    pub description: String,
    /// Optional external reference.
    pub reference: Option<String>,
    /// The debit/credit legs (must balance).
    pub lines: Vec<LineInput>,
}

/// Debit and credit totals of a proposed entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryTotals {
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub const fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Returns true if the totals agree within the given tolerance.
    #[must_use]
    pub fn is_balanced_within(&self, tolerance: Decimal) -> bool {
        self.difference().abs() <= tolerance
    }
}

/// The date window a balance query aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    /// Everything up to and including the given date.
    AsOf(NaiveDate),
    /// Everything between the two dates, inclusive.
    Between {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },
}

impl ReportPeriod {
    /// Returns true if the given transaction date falls inside this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::AsOf(as_of) => date <= *as_of,
            Self::Between { start, end } => date >= *start && date <= *end,
        }
    }
}

/// Filter for a single-pass balance aggregation.
#[derive(Debug, Clone)]
pub struct BalanceFilter {
    /// Restrict to these accounts, if set.
    pub account_ids: Option<Vec<AccountId>>,
    /// Restrict to these categories, if set.
    pub categories: Option<Vec<AccountCategory>>,
    /// The date window.
    pub period: ReportPeriod,
}

/// Per-account debit/credit totals joined with the account header.
#[derive(Debug, Clone)]
pub struct AccountTotals {
    /// The account the totals belong to.
    pub account: Account,
    /// Sum of debit legs in the window.
    pub total_debit: Decimal,
    /// Sum of credit legs in the window.
    pub total_credit: Decimal,
}

impl AccountTotals {
    /// Returns the balance signed by the account's category normal side.
    #[must_use]
    pub fn signed_balance(&self) -> Decimal {
        self.account
            .category
            .signed_balance(self.total_debit, self.total_credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_balanced_within_tolerance() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.01));
        assert!(totals.is_balanced_within(dec!(0.01)));
        assert!(!totals.is_balanced_within(dec!(0.001)));
        assert_eq!(totals.difference(), dec!(-0.01));
    }

    #[test]
    fn test_period_as_of() {
        let period = ReportPeriod::AsOf(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()));
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
    }

    #[test]
    fn test_period_between_is_inclusive() {
        let period = ReportPeriod::Between {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        };
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[test]
    fn test_line_input_constructors() {
        let account = AccountId::new();
        let debit = LineInput::debit(account, dec!(50));
        let credit = LineInput::credit(account, dec!(50));
        assert_eq!(debit.side, EntrySide::Debit);
        assert_eq!(credit.side, EntrySide::Credit);
        assert_eq!(debit.amount, credit.amount);
    }
}
