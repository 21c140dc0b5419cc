//! Account domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kopra_shared::types::{AccountId, TenantId};

/// Statutory account category.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Asset account (debit-normal).
    Asset,
    /// Liability account (credit-normal).
    Liability,
    /// Equity account (credit-normal).
    Equity,
    /// Revenue account (credit-normal).
    Revenue,
    /// Expense account (debit-normal).
    Expense,
}

impl AccountCategory {
    /// Returns true for debit-normal categories (asset, expense).
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Returns the signed balance for the given debit and credit totals.
    ///
    /// Debit-normal categories carry `debit - credit`; credit-normal
    /// categories carry `credit - debit`.
    #[must_use]
    pub fn signed_balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }

    /// Balance sheet categories.
    #[must_use]
    pub const fn balance_sheet() -> [Self; 3] {
        [Self::Asset, Self::Liability, Self::Equity]
    }

    /// Income statement categories.
    #[must_use]
    pub const fn income_statement() -> [Self; 2] {
        [Self::Revenue, Self::Expense]
    }
}

/// A node in a tenant's chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Tenant this account belongs to.
    pub tenant_id: TenantId,
    /// Account code, unique per tenant (e.g., "1100").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Statutory category.
    pub category: AccountCategory,
    /// Parent account, if this is not a top-level account.
    pub parent_id: Option<AccountId>,
    /// Depth in the hierarchy; top-level accounts are level 1.
    pub level: i16,
    /// Whether the account accepts new postings.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_side() {
        assert!(AccountCategory::Asset.is_debit_normal());
        assert!(AccountCategory::Expense.is_debit_normal());
        assert!(!AccountCategory::Liability.is_debit_normal());
        assert!(!AccountCategory::Equity.is_debit_normal());
        assert!(!AccountCategory::Revenue.is_debit_normal());
    }

    #[test]
    fn test_signed_balance_debit_normal() {
        assert_eq!(
            AccountCategory::Asset.signed_balance(dec!(100), dec!(30)),
            dec!(70)
        );
        assert_eq!(
            AccountCategory::Expense.signed_balance(dec!(0), dec!(50)),
            dec!(-50)
        );
    }

    #[test]
    fn test_signed_balance_credit_normal() {
        assert_eq!(
            AccountCategory::Liability.signed_balance(dec!(30), dec!(100)),
            dec!(70)
        );
        assert_eq!(
            AccountCategory::Revenue.signed_balance(dec!(50), dec!(0)),
            dec!(-50)
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AccountCategory::Liability).unwrap();
        assert_eq!(json, "\"liability\"");
    }
}
