//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::{AccountCategory, AccountTreeNode};

/// One statutory category of a report: the reconstructed account trees and
/// their combined total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySection {
    /// The statutory category.
    pub category: AccountCategory,
    /// Sum of the root balances.
    pub total: Decimal,
    /// Account trees, ordered by account code.
    pub accounts: Vec<AccountTreeNode>,
}

/// Balance sheet totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetTotals {
    /// Total assets.
    pub assets: Decimal,
    /// Total liabilities.
    pub liabilities: Decimal,
    /// Total equity.
    pub equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
}

/// Balance sheet report.
///
/// `is_balanced` is data, not an error: books out of balance must be visible
/// to the caller, never hidden behind an exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// As-of date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: CategorySection,
    /// Liabilities section.
    pub liabilities: CategorySection,
    /// Equity section.
    pub equity: CategorySection,
    /// Totals per category.
    pub totals: BalanceSheetTotals,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
    /// Assets minus (liabilities plus equity).
    pub balance_difference: Decimal,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Revenues section.
    pub revenues: CategorySection,
    /// Expenses section.
    pub expenses: CategorySection,
    /// Revenues minus expenses.
    pub net_income: Decimal,
    /// Net income as a percentage of revenue; `None` when revenue is zero.
    pub net_margin_percentage: Option<Decimal>,
}
