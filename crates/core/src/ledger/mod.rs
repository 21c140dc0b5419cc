//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and their debit/credit lines
//! - Balance invariant validation
//! - Posting, approval, and reversal
//! - Single-pass balance aggregation
//! - The storage port and its in-memory reference implementation

pub mod entry;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry::{EntrySide, JournalEntry, JournalLine};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use service::Ledger;
pub use store::{LedgerStore, PostedEntryListener};
pub use types::{
    AccountTotals, BalanceFilter, EntryInput, EntryTotals, LineInput, ReportPeriod,
};
pub use validation::validate_lines;
