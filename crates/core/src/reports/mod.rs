//! Financial report assembly.
//!
//! This module turns tenant-scoped ledger balances into statutory reports:
//! - Balance Sheet (assets / liabilities / equity)
//! - Income Statement (revenues / expenses)
//!
//! plus the per-tenant report cache invalidated on every accepted posting.

pub mod cache;
pub mod error;
pub mod service;
pub mod types;


pub use cache::ReportCache;
pub use error::ReportError;
pub use service::ReportAssembler;
pub use types::{BalanceSheet, BalanceSheetTotals, CategorySection, IncomeStatement};
