//! Chart of accounts and hierarchy aggregation.
//!
//! This module defines the account domain types and the tree builder that
//! reconstructs the multi-level chart-of-accounts hierarchy from flat,
//! tenant-scoped balance rows.

pub mod error;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tree_props;

pub use error::HierarchyError;
pub use tree::{build_tree, AccountTree, AccountTreeNode, BalanceRow};
pub use types::{Account, AccountCategory};
