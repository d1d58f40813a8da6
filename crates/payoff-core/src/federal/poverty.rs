//! HHS poverty guidelines, the income floor of every income-driven formula.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::loans::{FinancialProfile, StateGroup};
use crate::types::Money;

/// Guideline year of the table below.
pub const GUIDELINE_YEAR: i32 = 2024;

/// Annual guideline for household sizes 1 through 8.
const CONTIGUOUS: [Money; 8] = [
    dec!(15060),
    dec!(20440),
    dec!(25820),
    dec!(31200),
    dec!(36580),
    dec!(41960),
    dec!(47340),
    dec!(52720),
];
const ALASKA: [Money; 8] = [
    dec!(18810),
    dec!(25540),
    dec!(32270),
    dec!(39000),
    dec!(45730),
    dec!(52460),
    dec!(59190),
    dec!(65920),
];
const HAWAII: [Money; 8] = [
    dec!(17310),
    dec!(23500),
    dec!(29690),
    dec!(35880),
    dec!(42070),
    dec!(48260),
    dec!(54450),
    dec!(60640),
];

/// Added for each household member beyond eight.
fn per_additional_member(state: StateGroup) -> Money {
    match state {
        StateGroup::Contiguous => dec!(5380),
        StateGroup::Alaska => dec!(6730),
        StateGroup::Hawaii => dec!(6190),
    }
}

/// Poverty guideline for a household. Sizes below one are treated as one.
pub fn poverty_guideline(state: StateGroup, family_size: u32) -> Money {
    let table = match state {
        StateGroup::Contiguous => &CONTIGUOUS,
        StateGroup::Alaska => &ALASKA,
        StateGroup::Hawaii => &HAWAII,
    };
    let size = family_size.max(1) as usize;
    if size <= table.len() {
        return table[size - 1];
    }
    let extra_members = Decimal::from((size - table.len()) as u64);
    table[table.len() - 1] + extra_members * per_additional_member(state)
}

/// `max(0, AGI − guideline × multiplier)`
pub fn discretionary_income(profile: &FinancialProfile, multiplier: Decimal) -> Money {
    let threshold = poverty_guideline(profile.state_group, profile.family_size) * multiplier;
    (profile.adjusted_gross_income - threshold).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::FilingStatus;

    fn profile(agi: Money, family_size: u32, state_group: StateGroup) -> FinancialProfile {
        FinancialProfile {
            adjusted_gross_income: agi,
            family_size,
            state_group,
            filing_status: FilingStatus::Single,
        }
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(poverty_guideline(StateGroup::Contiguous, 1), dec!(15060));
        assert_eq!(poverty_guideline(StateGroup::Contiguous, 4), dec!(31200));
        assert_eq!(poverty_guideline(StateGroup::Alaska, 1), dec!(18810));
        assert_eq!(poverty_guideline(StateGroup::Hawaii, 2), dec!(23500));
    }

    #[test]
    fn test_large_household_extends_by_increment() {
        assert_eq!(
            poverty_guideline(StateGroup::Contiguous, 10),
            dec!(52720) + dec!(2) * dec!(5380)
        );
    }

    #[test]
    fn test_table_rows_follow_increment() {
        for state in [StateGroup::Contiguous, StateGroup::Alaska, StateGroup::Hawaii] {
            for size in 2..=8 {
                assert_eq!(
                    poverty_guideline(state, size) - poverty_guideline(state, size - 1),
                    per_additional_member(state),
                    "{state:?} size {size}"
                );
            }
        }
    }

    #[test]
    fn test_discretionary_income() {
        let p = profile(dec!(50000), 1, StateGroup::Contiguous);
        // 50,000 - 1.5 * 15,060 = 27,410
        assert_eq!(discretionary_income(&p, dec!(1.5)), dec!(27410));
    }

    #[test]
    fn test_discretionary_income_floors_at_zero() {
        let p = profile(dec!(20000), 3, StateGroup::Hawaii);
        assert_eq!(discretionary_income(&p, dec!(2.25)), Decimal::ZERO);
    }
}
