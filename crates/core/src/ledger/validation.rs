//! Balance invariant validation for proposed entries.

use rust_decimal::Decimal;

use super::entry::EntrySide;
use super::error::LedgerError;
use super::types::{EntryTotals, LineInput};

/// Validates the shape and balance of a proposed set of lines.
///
/// Checks, in order: lines are present, every amount is positive, both sides
/// are represented, and `|sum(debit) - sum(credit)| <= tolerance`.
///
/// # Errors
///
/// Returns a validation error or `UnbalancedEntry` without writing anything.
pub fn validate_lines(lines: &[LineInput], tolerance: Decimal) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match line.side {
            EntrySide::Debit => {
                total_debit += line.amount;
                has_debit = true;
            }
            EntrySide::Credit => {
                total_credit += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    let totals = EntryTotals::new(total_debit, total_credit);
    if !totals.is_balanced_within(tolerance) {
        return Err(LedgerError::UnbalancedEntry {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use kopra_shared::types::AccountId;

    const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

    fn debit(amount: Decimal) -> LineInput {
        LineInput::debit(AccountId::new(), amount)
    }

    fn credit(amount: Decimal) -> LineInput {
        LineInput::credit(AccountId::new(), amount)
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![debit(dec!(100)), credit(dec!(100))];
        let totals = validate_lines(&lines, TOLERANCE).unwrap();
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
    }

    #[test]
    fn test_unbalanced_lines() {
        let lines = vec![debit(dec!(100)), credit(dec!(50))];
        assert!(matches!(
            validate_lines(&lines, TOLERANCE),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_within_tolerance_accepted() {
        let lines = vec![debit(dec!(100.00)), credit(dec!(100.01))];
        assert!(validate_lines(&lines, TOLERANCE).is_ok());
    }

    #[test]
    fn test_just_beyond_tolerance_rejected() {
        let lines = vec![debit(dec!(100.00)), credit(dec!(100.02))];
        assert!(matches!(
            validate_lines(&lines, TOLERANCE),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_no_lines() {
        assert!(matches!(
            validate_lines(&[], TOLERANCE),
            Err(LedgerError::NoLines)
        ));
    }

    #[test]
    fn test_single_sided() {
        let lines = vec![debit(dec!(100)), debit(dec!(100))];
        assert!(matches!(
            validate_lines(&lines, TOLERANCE),
            Err(LedgerError::SingleSided)
        ));
    }

    #[test]
    fn test_zero_amount() {
        let lines = vec![debit(dec!(0)), credit(dec!(100))];
        assert!(matches!(
            validate_lines(&lines, TOLERANCE),
            Err(LedgerError::ZeroAmount)
        ));
    }

    #[test]
    fn test_negative_amount() {
        let lines = vec![debit(dec!(-100)), credit(dec!(100))];
        assert!(matches!(
            validate_lines(&lines, TOLERANCE),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_multi_line_split() {
        let lines = vec![
            debit(dec!(60)),
            debit(dec!(40)),
            credit(dec!(75)),
            credit(dec!(25)),
        ];
        let totals = validate_lines(&lines, TOLERANCE).unwrap();
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
    }
}
