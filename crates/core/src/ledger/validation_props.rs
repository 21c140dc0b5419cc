//! Property tests for the balance invariant.

use proptest::prelude::*;
use rust_decimal::Decimal;
use kopra_shared::types::AccountId;

use super::error::LedgerError;
use super::types::LineInput;
use super::validation::validate_lines;

fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Positive amounts in cents, up to 10 million.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn amounts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(amount_strategy(), 1..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any set of debits mirrored by one credit of the same total is
    /// accepted, and the reported totals agree exactly.
    #[test]
    fn prop_mirrored_lines_accepted(debits in amounts_strategy(10)) {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<LineInput> = debits
            .iter()
            .map(|amount| LineInput::debit(AccountId::new(), *amount))
            .collect();
        lines.push(LineInput::credit(AccountId::new(), total));

        let totals = validate_lines(&lines, tolerance()).expect("mirrored lines must balance");
        prop_assert_eq!(totals.total_debit, total);
        prop_assert_eq!(totals.total_credit, total);
    }

    /// A two-sided entry is accepted iff the totals agree within tolerance;
    /// rejected entries report the exact totals.
    #[test]
    fn prop_accepted_iff_within_tolerance(
        debits in amounts_strategy(6),
        credits in amounts_strategy(6),
    ) {
        let total_debit: Decimal = debits.iter().copied().sum();
        let total_credit: Decimal = credits.iter().copied().sum();

        let lines: Vec<LineInput> = debits
            .iter()
            .map(|amount| LineInput::debit(AccountId::new(), *amount))
            .chain(
                credits
                    .iter()
                    .map(|amount| LineInput::credit(AccountId::new(), *amount)),
            )
            .collect();

        let balanced = (total_debit - total_credit).abs() <= tolerance();
        match validate_lines(&lines, tolerance()) {
            Ok(totals) => {
                prop_assert!(balanced);
                prop_assert_eq!(totals.total_debit, total_debit);
                prop_assert_eq!(totals.total_credit, total_credit);
            }
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                prop_assert!(!balanced);
                prop_assert_eq!(debit, total_debit);
                prop_assert_eq!(credit, total_credit);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Perturbing one leg beyond the tolerance always breaks acceptance.
    #[test]
    fn prop_perturbation_beyond_tolerance_rejected(
        debits in amounts_strategy(8),
        extra_cents in 2i64..1_000_000,
    ) {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<LineInput> = debits
            .iter()
            .map(|amount| LineInput::debit(AccountId::new(), *amount))
            .collect();
        lines.push(LineInput::credit(
            AccountId::new(),
            total + Decimal::new(extra_cents, 2),
        ));

        let is_unbalanced = matches!(
            validate_lines(&lines, tolerance()),
            Err(LedgerError::UnbalancedEntry { .. })
        );
        prop_assert!(is_unbalanced);
    }
}
