//! Report assembly.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use kopra_shared::types::TenantId;

use crate::account::{build_tree, AccountCategory, BalanceRow};
use crate::ledger::{Ledger, ReportPeriod};

use super::error::ReportError;
use super::types::{BalanceSheet, BalanceSheetTotals, CategorySection, IncomeStatement};

/// Assembles statutory reports from ledger balances.
///
/// Each report is one balance query against the ledger, partitioned by
/// category, with the account hierarchy rebuilt per category.
pub struct ReportAssembler {
    ledger: Arc<Ledger>,
}

impl ReportAssembler {
    /// Creates an assembler over the given ledger.
    #[must_use]
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Builds the balance sheet as of a date.
    ///
    /// Book imbalance is reported through `is_balanced` and
    /// `balance_difference`, never as an error.
    ///
    /// # Errors
    ///
    /// Fails wholesale if the balance query or hierarchy reconstruction
    /// fails.
    pub fn balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheet, ReportError> {
        let rows = self.ledger.balance_rows(
            tenant_id,
            &AccountCategory::balance_sheet(),
            ReportPeriod::AsOf(as_of),
        )?;

        let (assets, liabilities, equity) = partition3(
            rows,
            AccountCategory::Asset,
            AccountCategory::Liability,
            AccountCategory::Equity,
        );
        let assets = self.section(tenant_id, AccountCategory::Asset, assets)?;
        let liabilities = self.section(tenant_id, AccountCategory::Liability, liabilities)?;
        let equity = self.section(tenant_id, AccountCategory::Equity, equity)?;

        let liabilities_and_equity = liabilities.total + equity.total;
        let balance_difference = assets.total - liabilities_and_equity;
        let is_balanced = balance_difference.abs() <= self.ledger.balance_tolerance();

        Ok(BalanceSheet {
            as_of,
            totals: BalanceSheetTotals {
                assets: assets.total,
                liabilities: liabilities.total,
                equity: equity.total,
                liabilities_and_equity,
            },
            assets,
            liabilities,
            equity,
            is_balanced,
            balance_difference,
        })
    }

    /// Builds the income statement for a period.
    ///
    /// # Errors
    ///
    /// Fails on an inverted date range, or wholesale if the balance query or
    /// hierarchy reconstruction fails.
    pub fn income_statement(
        &self,
        tenant_id: TenantId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<IncomeStatement, ReportError> {
        if period_start > period_end {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let rows = self.ledger.balance_rows(
            tenant_id,
            &AccountCategory::income_statement(),
            ReportPeriod::Between {
                start: period_start,
                end: period_end,
            },
        )?;

        let (revenue_rows, expense_rows): (Vec<BalanceRow>, Vec<BalanceRow>) = rows
            .into_iter()
            .partition(|row| row.category == AccountCategory::Revenue);
        let revenues = self.section(tenant_id, AccountCategory::Revenue, revenue_rows)?;
        let expenses = self.section(tenant_id, AccountCategory::Expense, expense_rows)?;

        let net_income = revenues.total - expenses.total;
        let net_margin_percentage = if revenues.total == Decimal::ZERO {
            None
        } else {
            Some((net_income * Decimal::ONE_HUNDRED / revenues.total).round_dp(2))
        };

        Ok(IncomeStatement {
            period_start,
            period_end,
            revenues,
            expenses,
            net_income,
            net_margin_percentage,
        })
    }

    fn section(
        &self,
        tenant_id: TenantId,
        category: AccountCategory,
        rows: Vec<BalanceRow>,
    ) -> Result<CategorySection, ReportError> {
        let tree = build_tree(tenant_id, category, rows, |account_id| {
            self.ledger.find_account(tenant_id, account_id)
        })?;
        Ok(CategorySection {
            category,
            total: tree.total,
            accounts: tree.roots,
        })
    }
}

/// Splits category-mixed rows into three buckets.
fn partition3(
    rows: Vec<BalanceRow>,
    a: AccountCategory,
    b: AccountCategory,
    c: AccountCategory,
) -> (Vec<BalanceRow>, Vec<BalanceRow>, Vec<BalanceRow>) {
    let mut first = Vec::new();
    let mut second = Vec::new();
    let mut third = Vec::new();
    for row in rows {
        if row.category == a {
            first.push(row);
        } else if row.category == b {
            second.push(row);
        } else if row.category == c {
            third.push(row);
        }
    }
    (first, second, third)
}
