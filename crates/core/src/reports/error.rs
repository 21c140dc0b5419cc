//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::account::HierarchyError;
use crate::ledger::LedgerError;

/// Errors that can occur during report generation.
///
/// A storage failure fails the whole report; partial reports are never
/// returned.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The account hierarchy could not be reconstructed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// The balance query failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Hierarchy(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
        }
    }
}
