//! Property tests for the account tree builder.

use proptest::prelude::*;
use rust_decimal::Decimal;
use kopra_shared::types::{AccountId, TenantId};
use kopra_shared::StoreError;

use super::tree::{build_tree, AccountTreeNode, BalanceRow};
use super::types::AccountCategory;

/// Strategy for a random forest: each node's parent index is strictly
/// smaller than its own, which guarantees the structure is acyclic.
fn forest_strategy() -> impl Strategy<Value = Vec<(Option<usize>, Decimal)>> {
    prop::collection::vec(
        (any::<prop::sample::Index>(), -1_000_000i64..1_000_000i64),
        1..40,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (index, cents))| {
                let parent = if i == 0 {
                    None
                } else {
                    // Roughly half the nodes become roots
                    let candidate = index.index(i * 2);
                    (candidate < i).then_some(candidate)
                };
                (parent, Decimal::new(cents, 2))
            })
            .collect()
    })
}

fn rows_from_forest(forest: &[(Option<usize>, Decimal)]) -> Vec<BalanceRow> {
    let ids: Vec<AccountId> = forest.iter().map(|_| AccountId::new()).collect();
    forest
        .iter()
        .enumerate()
        .map(|(i, (parent, balance))| BalanceRow {
            account_id: ids[i],
            code: format!("{:04}", 1000 + i),
            name: format!("Account {i}"),
            category: AccountCategory::Asset,
            parent_id: parent.map(|p| ids[p]),
            level: 1,
            balance: *balance,
        })
        .collect()
}

fn no_ancestors(_: AccountId) -> Result<Option<super::types::Account>, StoreError> {
    Ok(None)
}

fn check_conservation(node: &AccountTreeNode) -> bool {
    if node.children.is_empty() {
        return true;
    }
    let sum: Decimal = node.children.iter().map(|c| c.balance).sum();
    node.balance == sum && node.children.iter().all(check_conservation)
}

fn count_nodes(node: &AccountTreeNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}

fn leaf_sum(node: &AccountTreeNode) -> Decimal {
    if node.children.is_empty() {
        node.balance
    } else {
        node.children.iter().map(leaf_sum).sum()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For every non-leaf node, balance equals the sum of its children,
    /// recursively, for arbitrary tree depth and shape.
    #[test]
    fn prop_hierarchy_conservation(forest in forest_strategy()) {
        let rows = rows_from_forest(&forest);
        let tree = build_tree(TenantId::new(), AccountCategory::Asset, rows, no_ancestors)
            .expect("acyclic forest must build");

        for root in &tree.roots {
            prop_assert!(check_conservation(root));
        }
    }

    /// No node is dropped or duplicated during reconstruction.
    #[test]
    fn prop_node_count_preserved(forest in forest_strategy()) {
        let rows = rows_from_forest(&forest);
        let expected = rows.len();
        let tree = build_tree(TenantId::new(), AccountCategory::Asset, rows, no_ancestors)
            .expect("acyclic forest must build");

        let total: usize = tree.roots.iter().map(count_nodes).sum();
        prop_assert_eq!(total, expected);
    }

    /// The category total equals the sum of all leaf balances.
    #[test]
    fn prop_total_equals_leaf_sum(forest in forest_strategy()) {
        let rows = rows_from_forest(&forest);
        let tree = build_tree(TenantId::new(), AccountCategory::Asset, rows, no_ancestors)
            .expect("acyclic forest must build");

        let leaves: Decimal = tree.roots.iter().map(leaf_sum).sum();
        prop_assert_eq!(tree.total, leaves);
    }
}
