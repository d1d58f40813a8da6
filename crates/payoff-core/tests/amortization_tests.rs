use chrono::NaiveDate;
use payoff_core::amortization::schedule::{build_amortization_schedule, AmortizationInput};
use payoff_core::amortization::{amortized_payment, simulate_schedule};
use payoff_core::{PayoffError, SimulationLimits};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization primitive
// ===========================================================================

#[test]
fn test_thirty_thousand_over_ten_years() {
    let payment = amortized_payment(dec!(30000), dec!(0.055) / dec!(12), 120).unwrap();
    assert_eq!(payment, dec!(325.58));
    assert_eq!(payment * dec!(120), dec!(39069.60));

    let summary = simulate_schedule(dec!(30000), dec!(0.055) / dec!(12), payment)
        .unwrap()
        .payoff()
        .unwrap();
    assert_eq!(summary.months, 120);
    assert_eq!(summary.total_interest, dec!(9069.36));
    assert_eq!(summary.total_paid, dec!(39069.36));
}

#[test]
fn test_interest_only_payment_is_rejected() {
    let err = simulate_schedule(dec!(30000), dec!(0.005), dec!(150)).unwrap_err();
    match err {
        PayoffError::NonAmortizingPayment { payment, interest } => {
            assert_eq!(payment, dec!(150));
            assert_eq!(interest, dec!(150));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_schedule_iteration_is_restartable() {
    let schedule = simulate_schedule(dec!(5000), dec!(0.004), dec!(500)).unwrap();
    let first: Vec<_> = schedule.iter().collect();
    let second: Vec<_> = (&schedule).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_amortization_table_end_to_end() {
    let input = AmortizationInput {
        balance: dec!(12000),
        annual_rate_percent: dec!(6),
        term_months: Some(60),
        monthly_payment: None,
        as_of: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        limits: SimulationLimits::default(),
    };
    let out = build_amortization_schedule(&input).unwrap();
    assert_eq!(out.result.months, 60);
    assert_eq!(out.result.schedule.len(), 60);
    assert_eq!(out.result.payoff_date, NaiveDate::from_ymd_opt(2031, 10, 1).unwrap());
    assert_eq!(out.result.total_paid, dec!(12000) + out.result.total_interest);
}

// ===========================================================================
// Properties
// ===========================================================================

fn money() -> impl Strategy<Value = Decimal> {
    (100_000i64..20_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn monthly_rate() -> impl Strategy<Value = Decimal> {
    // 0.01% .. 15% annual, in basis points
    (1i64..1500i64).prop_map(|bps| Decimal::new(bps, 4) / dec!(12))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_payment_never_undercharges(
        balance in money(),
        rate in monthly_rate(),
        term in 12u32..=360,
    ) {
        let payment = amortized_payment(balance, rate, term).unwrap();
        prop_assert!(payment * Decimal::from(term) >= balance);
    }

    #[test]
    fn prop_amortized_payment_retires_within_term(
        balance in money(),
        rate in monthly_rate(),
        term in 12u32..=360,
    ) {
        let payment = amortized_payment(balance, rate, term).unwrap();
        let summary = simulate_schedule(balance, rate, payment)
            .unwrap()
            .settled_by(term)
            .payoff()
            .unwrap();
        prop_assert!(summary.months <= term);
        let closed_form_interest = payment * Decimal::from(term) - balance;
        prop_assert!(summary.total_interest <= closed_form_interest * dec!(1.001) + dec!(0.01));
        prop_assert_eq!(summary.total_paid, balance + summary.total_interest);
    }

    #[test]
    fn prop_smaller_payment_never_ends_sooner(
        balance in money(),
        rate in monthly_rate(),
        term in 24u32..=240,
    ) {
        let payment = amortized_payment(balance, rate, term).unwrap();
        let fast = simulate_schedule(balance, rate, payment + dec!(25)).unwrap().summarize();
        let slow = simulate_schedule(balance, rate, payment).unwrap().summarize();
        prop_assert!(fast.months <= slow.months);
        prop_assert!(fast.total_interest <= slow.total_interest);
    }
}
