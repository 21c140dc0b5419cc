//! Account hierarchy reconstruction and bottom-up balance aggregation.
//!
//! The builder takes a flat, tenant-scoped set of balance rows and rebuilds
//! the chart-of-accounts tree as an arena of nodes indexed by `AccountId`.
//! Ancestors that carry no direct postings (and therefore never appear in a
//! balance query) are fetched explicitly so the hierarchy is never truncated.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kopra_shared::types::{AccountId, TenantId};
use kopra_shared::StoreError;

use super::error::HierarchyError;
use super::types::{Account, AccountCategory};

/// A flat balance row, the input to the tree builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Statutory category.
    pub category: AccountCategory,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
    /// Depth in the hierarchy.
    pub level: i16,
    /// Signed balance for this account's direct postings.
    pub balance: Decimal,
}

/// An account decorated with its aggregated balance and children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTreeNode {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Depth in the hierarchy.
    pub level: i16,
    /// Aggregated balance: own postings for leaves, sum of children otherwise.
    pub balance: Decimal,
    /// Child nodes, ordered by account code.
    pub children: Vec<AccountTreeNode>,
}

/// A reconstructed hierarchy for one statutory category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountTree {
    /// Root nodes, ordered by account code.
    pub roots: Vec<AccountTreeNode>,
    /// Sum of the root balances.
    pub total: Decimal,
}

/// Arena slot used while the hierarchy is being rebuilt.
struct Slot {
    code: String,
    name: String,
    parent_id: Option<AccountId>,
    level: i16,
    balance: Decimal,
    children: Vec<AccountId>,
}

/// Rebuilds the account hierarchy for one category and aggregates balances
/// bottom-up.
///
/// `fetch_ancestor` resolves accounts referenced as parents but absent from
/// `rows`; it must be scoped to `tenant_id` and return `None` for accounts
/// the tenant does not own. An ancestor resolved to a different category
/// marks the section boundary: its child becomes a root of this tree. An
/// ancestor that cannot be resolved at all is a data-integrity error; it is
/// logged and the child is promoted to root rather than dropped.
///
/// # Errors
///
/// Returns `HierarchyError::CycleDetected` if the parent chain loops, or a
/// storage error if an ancestor fetch fails.
pub fn build_tree<F>(
    tenant_id: TenantId,
    category: AccountCategory,
    rows: Vec<BalanceRow>,
    mut fetch_ancestor: F,
) -> Result<AccountTree, HierarchyError>
where
    F: FnMut(AccountId) -> Result<Option<Account>, StoreError>,
{
    let mut slots: HashMap<AccountId, Slot> = HashMap::with_capacity(rows.len());
    let mut pending: Vec<AccountId> = Vec::new();

    for row in rows {
        if let Some(parent) = row.parent_id {
            pending.push(parent);
        }
        slots.insert(
            row.account_id,
            Slot {
                code: row.code,
                name: row.name,
                parent_id: row.parent_id,
                level: row.level,
                balance: row.balance,
                children: Vec::new(),
            },
        );
    }

    // Complete the ancestor chain: a parent with zero direct postings must
    // still appear when it has descendants with postings.
    let mut out_of_scope: Vec<AccountId> = Vec::new();
    let mut missing: Vec<AccountId> = Vec::new();
    while let Some(parent_id) = pending.pop() {
        if slots.contains_key(&parent_id)
            || out_of_scope.contains(&parent_id)
            || missing.contains(&parent_id)
        {
            continue;
        }
        match fetch_ancestor(parent_id)? {
            Some(account) if account.category == category => {
                if let Some(grandparent) = account.parent_id {
                    pending.push(grandparent);
                }
                slots.insert(
                    parent_id,
                    Slot {
                        code: account.code,
                        name: account.name,
                        parent_id: account.parent_id,
                        level: account.level,
                        balance: Decimal::ZERO,
                        children: Vec::new(),
                    },
                );
            }
            // Section boundary: the parent lives in another category, so its
            // children become roots of this tree.
            Some(_) => out_of_scope.push(parent_id),
            // Nonexistent or other-tenant parent: data-integrity error.
            None => missing.push(parent_id),
        }
    }

    // Deterministic output: children and roots in account-code order.
    let mut ids: Vec<AccountId> = slots.keys().copied().collect();
    ids.sort_by(|a, b| slots[a].code.cmp(&slots[b].code));

    let mut roots: Vec<AccountId> = Vec::new();
    for id in &ids {
        let parent = slots[id].parent_id;
        match parent {
            Some(parent_id) if slots.contains_key(&parent_id) => {
                if let Some(parent) = slots.get_mut(&parent_id) {
                    parent.children.push(*id);
                }
            }
            Some(parent_id) => {
                if missing.contains(&parent_id) {
                    tracing::error!(
                        tenant_id = %tenant_id,
                        account_id = %id,
                        parent_id = %parent_id,
                        "orphaned parent reference in chart of accounts; promoting account to root"
                    );
                }
                roots.push(*id);
            }
            None => roots.push(*id),
        }
    }

    // Post-order walk; every slot must be reachable from a root, otherwise
    // the parent chain loops.
    let order = post_order(&slots, &roots);
    if order.len() != slots.len() {
        let cycle_member = ids
            .iter()
            .copied()
            .find(|id| !order.contains(id))
            .unwrap_or_else(|| AccountId::from_uuid(uuid::Uuid::nil()));
        tracing::error!(
            tenant_id = %tenant_id,
            account_id = %cycle_member,
            "cycle detected in chart of accounts hierarchy"
        );
        return Err(HierarchyError::CycleDetected(cycle_member));
    }

    // Materialize bottom-up: children are finished before their parent, and
    // a non-leaf's balance is always the sum of its children.
    let mut built: HashMap<AccountId, AccountTreeNode> = HashMap::with_capacity(order.len());
    for id in order {
        if let Some(slot) = slots.remove(&id) {
            let children: Vec<AccountTreeNode> = slot
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            let balance = if children.is_empty() {
                slot.balance
            } else {
                children.iter().map(|child| child.balance).sum()
            };
            built.insert(
                id,
                AccountTreeNode {
                    account_id: id,
                    code: slot.code,
                    name: slot.name,
                    level: slot.level,
                    balance,
                    children,
                },
            );
        }
    }

    let root_nodes: Vec<AccountTreeNode> = roots
        .iter()
        .filter_map(|root| built.remove(root))
        .collect();
    let total = root_nodes.iter().map(|node| node.balance).sum();

    Ok(AccountTree {
        roots: root_nodes,
        total,
    })
}

/// Iterative post-order traversal over the arena.
fn post_order(slots: &HashMap<AccountId, Slot>, roots: &[AccountId]) -> Vec<AccountId> {
    let mut order: Vec<AccountId> = Vec::with_capacity(slots.len());
    let mut stack: Vec<(AccountId, usize)> = Vec::new();

    for root in roots {
        stack.push((*root, 0));
        while let Some((id, child_index)) = stack.last().copied() {
            let children = slots.get(&id).map(|slot| slot.children.as_slice());
            match children {
                Some(children) if child_index < children.len() => {
                    if let Some(last) = stack.last_mut() {
                        last.1 += 1;
                    }
                    stack.push((children[child_index], 0));
                }
                _ => {
                    order.push(id);
                    stack.pop();
                }
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tenant() -> TenantId {
        TenantId::new()
    }

    fn row(
        id: AccountId,
        code: &str,
        parent: Option<AccountId>,
        level: i16,
        balance: Decimal,
    ) -> BalanceRow {
        BalanceRow {
            account_id: id,
            code: code.to_string(),
            name: format!("Account {code}"),
            category: AccountCategory::Asset,
            parent_id: parent,
            level,
            balance,
        }
    }

    fn account(
        tenant_id: TenantId,
        id: AccountId,
        code: &str,
        parent: Option<AccountId>,
        level: i16,
    ) -> Account {
        Account {
            id,
            tenant_id,
            code: code.to_string(),
            name: format!("Account {code}"),
            category: AccountCategory::Asset,
            parent_id: parent,
            level,
            is_active: true,
        }
    }

    fn no_ancestors(_: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(None)
    }

    #[test]
    fn test_flat_rows_become_roots() {
        let t = tenant();
        let (a, b) = (AccountId::new(), AccountId::new());
        let rows = vec![
            row(b, "1200", None, 1, dec!(200_000)),
            row(a, "1100", None, 1, dec!(500_000)),
        ];

        let tree = build_tree(t, AccountCategory::Asset, rows, no_ancestors).unwrap();

        assert_eq!(tree.roots.len(), 2);
        // Ordered by code regardless of input order
        assert_eq!(tree.roots[0].code, "1100");
        assert_eq!(tree.roots[1].code, "1200");
        assert_eq!(tree.total, dec!(700_000));
    }

    #[test]
    fn test_parent_balance_is_sum_of_children() {
        let t = tenant();
        let (parent, cash, receivables) = (AccountId::new(), AccountId::new(), AccountId::new());
        let rows = vec![
            row(parent, "1000", None, 1, Decimal::ZERO),
            row(cash, "1100", Some(parent), 2, dec!(500_000)),
            row(receivables, "1200", Some(parent), 2, dec!(200_000)),
        ];

        let tree = build_tree(t, AccountCategory::Asset, rows, no_ancestors).unwrap();

        assert_eq!(tree.roots.len(), 1);
        let root = &tree.roots[0];
        assert_eq!(root.balance, dec!(700_000));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].balance, dec!(500_000));
        assert_eq!(tree.total, dec!(700_000));
    }

    #[test]
    fn test_missing_ancestor_is_fetched() {
        let t = tenant();
        let (grandparent, parent, leaf) = (AccountId::new(), AccountId::new(), AccountId::new());
        let rows = vec![row(leaf, "1110", Some(parent), 3, dec!(42_000))];

        let fetch = |id: AccountId| -> Result<Option<Account>, StoreError> {
            if id == parent {
                Ok(Some(account(t, parent, "1100", Some(grandparent), 2)))
            } else if id == grandparent {
                Ok(Some(account(t, grandparent, "1000", None, 1)))
            } else {
                Ok(None)
            }
        };

        let tree = build_tree(t, AccountCategory::Asset, rows, fetch).unwrap();

        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].code, "1000");
        assert_eq!(tree.roots[0].balance, dec!(42_000));
        assert_eq!(tree.roots[0].children[0].code, "1100");
        assert_eq!(tree.roots[0].children[0].children[0].code, "1110");
        assert_eq!(tree.total, dec!(42_000));
    }

    #[test]
    fn test_orphaned_parent_promotes_to_root() {
        let t = tenant();
        let (leaf, ghost) = (AccountId::new(), AccountId::new());
        let rows = vec![row(leaf, "1100", Some(ghost), 2, dec!(10_000))];

        let tree = build_tree(t, AccountCategory::Asset, rows, no_ancestors).unwrap();

        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].account_id, leaf);
        assert_eq!(tree.total, dec!(10_000));
    }

    #[test]
    fn test_parent_in_other_category_marks_boundary() {
        let t = tenant();
        let (leaf, liability_parent) = (AccountId::new(), AccountId::new());
        let rows = vec![row(leaf, "1100", Some(liability_parent), 2, dec!(10_000))];

        let fetch = move |id: AccountId| -> Result<Option<Account>, StoreError> {
            if id == liability_parent {
                let mut acc = account(t, liability_parent, "2000", None, 1);
                acc.category = AccountCategory::Liability;
                Ok(Some(acc))
            } else {
                Ok(None)
            }
        };

        let tree = build_tree(t, AccountCategory::Asset, rows, fetch).unwrap();

        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].account_id, leaf);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let t = tenant();
        let (a, b) = (AccountId::new(), AccountId::new());
        let rows = vec![
            row(a, "1100", Some(b), 2, dec!(1_000)),
            row(b, "1200", Some(a), 2, dec!(2_000)),
        ];

        let result = build_tree(t, AccountCategory::Asset, rows, no_ancestors);
        assert!(matches!(result, Err(HierarchyError::CycleDetected(_))));
    }

    #[test]
    fn test_non_leaf_own_balance_is_overwritten() {
        let t = tenant();
        let (parent, child) = (AccountId::new(), AccountId::new());
        // A non-leaf with a direct posting of 999 that must not survive
        let rows = vec![
            row(parent, "1000", None, 1, dec!(999)),
            row(child, "1100", Some(parent), 2, dec!(100)),
        ];

        let tree = build_tree(t, AccountCategory::Asset, rows, no_ancestors).unwrap();

        assert_eq!(tree.roots[0].balance, dec!(100));
        assert_eq!(tree.total, dec!(100));
    }

    #[test]
    fn test_deep_chain() {
        let t = tenant();
        let ids: Vec<AccountId> = (0..100).map(|_| AccountId::new()).collect();
        let mut rows = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            let parent = if i == 0 { None } else { Some(ids[i - 1]) };
            let balance = if i == 99 { dec!(7) } else { Decimal::ZERO };
            #[allow(clippy::cast_possible_truncation)]
            let level = (i + 1) as i16;
            rows.push(row(*id, &format!("1{i:03}"), parent, level, balance));
        }

        let tree = build_tree(t, AccountCategory::Asset, rows, no_ancestors).unwrap();

        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].balance, dec!(7));
        assert_eq!(tree.total, dec!(7));
    }

    #[test]
    fn test_empty_rows_build_empty_tree() {
        let tree = build_tree(tenant(), AccountCategory::Asset, vec![], no_ancestors).unwrap();
        assert!(tree.roots.is_empty());
        assert_eq!(tree.total, Decimal::ZERO);
    }

    #[test]
    fn test_storage_error_propagates() {
        let t = tenant();
        let (leaf, ghost) = (AccountId::new(), AccountId::new());
        let rows = vec![row(leaf, "1100", Some(ghost), 2, dec!(10_000))];

        let fetch = |_: AccountId| -> Result<Option<Account>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        };

        let result = build_tree(t, AccountCategory::Asset, rows, fetch);
        assert!(matches!(result, Err(HierarchyError::Storage(_))));
    }
}
