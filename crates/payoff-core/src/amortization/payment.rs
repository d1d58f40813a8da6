//! Closed-form payment formulas.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::PayoffError;
use crate::types::{ceil_cents, Money, Rate};
use crate::PayoffResult;

/// Level monthly payment that retires `balance` in `term_months` at
/// `monthly_rate`, rounded up to the cent so the loan is never undercharged.
///
/// `P = B · r(1+r)^n / ((1+r)^n − 1)`, or `B / n` when the rate is zero.
pub fn amortized_payment(
    balance: Money,
    monthly_rate: Rate,
    term_months: u32,
) -> PayoffResult<Money> {
    validate_terms(balance, monthly_rate, term_months)?;

    let n = Decimal::from(term_months);
    if monthly_rate.is_zero() {
        return Ok(ceil_cents(balance / n));
    }

    let factor = (Decimal::ONE + monthly_rate)
        .checked_powi(term_months as i64)
        .ok_or_else(|| PayoffError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Rate and term overflow the compounding factor".into(),
        })?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(PayoffError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Rate too small to amortize at decimal precision".into(),
        });
    }

    Ok(ceil_cents(balance * monthly_rate * factor / denominator))
}

/// First payment of a graduated schedule whose payment grows by
/// `step_growth` every `step_months` and retires the balance in
/// `term_months`.
///
/// Each step is a level annuity, so the balance equals
/// `P · a(step) · Σ (1+g)^k · v^(step·k)` over the steps.
pub fn graduated_initial_payment(
    balance: Money,
    monthly_rate: Rate,
    term_months: u32,
    step_months: u32,
    step_growth: Rate,
) -> PayoffResult<Money> {
    validate_terms(balance, monthly_rate, term_months)?;
    if step_months == 0 || term_months % step_months != 0 {
        return Err(PayoffError::InvalidInput {
            field: "step_months".into(),
            reason: "Steps must evenly divide the term".into(),
        });
    }

    let steps = term_months / step_months;
    let (step_annuity, step_discount) = if monthly_rate.is_zero() {
        (Decimal::from(step_months), Decimal::ONE)
    } else {
        let compounding = (Decimal::ONE + monthly_rate)
            .checked_powi(step_months as i64)
            .ok_or_else(|| PayoffError::InvalidInput {
                field: "monthly_rate".into(),
                reason: "Rate and step overflow the compounding factor".into(),
            })?;
        let discount = Decimal::ONE / compounding;
        ((Decimal::ONE - discount) / monthly_rate, discount)
    };

    let mut factor_sum = Decimal::ZERO;
    let mut growth = Decimal::ONE;
    let mut discount = Decimal::ONE;
    for _ in 0..steps {
        factor_sum += growth * discount;
        growth *= Decimal::ONE + step_growth;
        discount *= step_discount;
    }

    Ok(ceil_cents(balance / (step_annuity * factor_sum)))
}

fn validate_terms(balance: Money, monthly_rate: Rate, term_months: u32) -> PayoffResult<()> {
    if balance <= Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "balance".into(),
            reason: "Balance must be positive".into(),
        });
    }
    if term_months == 0 {
        return Err(PayoffError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least one month".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_ten_year_payment() {
        // $30,000 at 5.5% over 120 months: 325.5798... rounded up
        let payment = amortized_payment(dec!(30000), dec!(0.055) / dec!(12), 120).unwrap();
        assert_eq!(payment, dec!(325.58));
        assert_eq!(payment * dec!(120), dec!(39069.60));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let payment = amortized_payment(dec!(1000), Decimal::ZERO, 3).unwrap();
        // 333.333... rounds up so three payments cover the balance
        assert_eq!(payment, dec!(333.34));
        assert!(payment * dec!(3) >= dec!(1000));
    }

    #[test]
    fn test_invalid_balance_and_term() {
        assert!(matches!(
            amortized_payment(Decimal::ZERO, dec!(0.005), 120),
            Err(PayoffError::InvalidInput { .. })
        ));
        assert!(matches!(
            amortized_payment(dec!(1000), dec!(0.005), 0),
            Err(PayoffError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_graduated_starts_below_level_payment() {
        let rate = dec!(0.06) / dec!(12);
        let level = amortized_payment(dec!(30000), rate, 120).unwrap();
        let initial = graduated_initial_payment(dec!(30000), rate, 120, 24, dec!(0.15)).unwrap();
        assert!(initial < level, "graduated {initial} should start below level {level}");
        assert!(initial > dec!(30000) * rate, "graduated must cover first-month interest");
    }

    #[test]
    fn test_graduated_without_growth_matches_level() {
        let rate = dec!(0.05) / dec!(12);
        let level = amortized_payment(dec!(20000), rate, 120).unwrap();
        let flat = graduated_initial_payment(dec!(20000), rate, 120, 24, Decimal::ZERO).unwrap();
        assert!((level - flat).abs() <= dec!(0.01));
    }
}
