use chrono::{Datelike, NaiveDate};
use payoff_core::acceleration::{
    accelerate_federal, accelerate_private, AccelerationMode, FederalAccelerationInput,
    PrivateAccelerationInput,
};
use payoff_core::federal::plans::RepaymentPlan;
use payoff_core::federal::repayment::{calculate_federal_plans, FederalPlansInput};
use payoff_core::loans::{BorrowingIntent, FinancialProfile, Loan, OriginationEra};
use payoff_core::{PayoffError, SimulationLimits};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

fn federal(
    plan: RepaymentPlan,
    mode: AccelerationMode,
    profile: Option<FinancialProfile>,
) -> FederalAccelerationInput {
    FederalAccelerationInput {
        loans: vec![Loan::federal(dec!(30000), dec!(5.5), OriginationEra::From2014To2026)],
        profile,
        intent: BorrowingIntent::No,
        plan,
        mode,
        as_of: as_of(),
        limits: SimulationLimits::default(),
    }
}

fn modest_income() -> FinancialProfile {
    FinancialProfile {
        adjusted_gross_income: dec!(52000),
        family_size: 1,
        state_group: Default::default(),
        filing_status: Default::default(),
    }
}

// ===========================================================================
// Extra-payment mode
// ===========================================================================

#[test]
fn test_extra_payment_on_standard_plan() {
    let out = accelerate_federal(&federal(
        RepaymentPlan::Standard,
        AccelerationMode::ExtraPayment { amount: dec!(200) },
        None,
    ))
    .unwrap();
    let r = &out.result;
    assert_eq!(r.baseline.months, 120);
    assert_eq!(r.baseline.total_interest, dec!(9069.36));
    assert!(r.accelerated.months < 120);
    assert_eq!(r.savings.months_saved, 120 - r.accelerated.months);
    assert_eq!(r.savings.years, r.savings.months_saved / 12);
    assert_eq!(r.savings.months, r.savings.months_saved % 12);
    assert!(!r.paid_off_before_forgiveness);
}

#[test]
fn test_extra_payment_beats_idr_forgiveness() {
    let out = accelerate_federal(&federal(
        RepaymentPlan::NewIbr,
        AccelerationMode::ExtraPayment { amount: dec!(400) },
        Some(modest_income()),
    ))
    .unwrap();
    let r = &out.result;
    assert!(r.baseline.forgiveness_date.is_some());
    assert!(r.accelerated.forgiveness_date.is_none());
    assert!(r.paid_off_before_forgiveness);
    assert!(out.warnings.iter().any(|w| w.contains("forgiveness")));
}

#[test]
fn test_negative_extra_payment() {
    let err = accelerate_private(&PrivateAccelerationInput {
        loans: vec![Loan::private(dec!(9000), dec!(7), dec!(10))],
        mode: AccelerationMode::ExtraPayment { amount: dec!(-20) },
        as_of: as_of(),
        limits: SimulationLimits::default(),
    })
    .unwrap_err();
    assert!(matches!(err, PayoffError::InvalidExtraPayment(amount) if amount == dec!(-20)));
}

// ===========================================================================
// Target-year mode
// ===========================================================================

#[test]
fn test_round_trip_target_is_already_met() {
    let out = accelerate_federal(&federal(
        RepaymentPlan::Standard,
        AccelerationMode::TargetYear { year: 2036 },
        None,
    ))
    .unwrap();
    assert!(out.result.already_meets_target);
    assert_eq!(out.result.required_extra_payment, Some(Decimal::ZERO));
    assert_eq!(out.result.accelerated, out.result.baseline);
}

#[test]
fn test_december_start_meets_reported_payoff_year() {
    let december = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
    let loans = vec![Loan::federal(dec!(1000), dec!(4.2), OriginationEra::From2014To2026)];
    let plans = calculate_federal_plans(&FederalPlansInput {
        loans: loans.clone(),
        profile: None,
        intent: BorrowingIntent::No,
        as_of: december,
        limits: SimulationLimits::default(),
    })
    .unwrap();
    let standard = plans
        .result
        .plans
        .iter()
        .find(|p| p.plan == RepaymentPlan::Standard)
        .unwrap();
    assert_eq!(standard.payoff_date, NaiveDate::from_ymd_opt(2036, 12, 1).unwrap());

    let out = accelerate_federal(&FederalAccelerationInput {
        loans,
        profile: None,
        intent: BorrowingIntent::No,
        plan: RepaymentPlan::Standard,
        mode: AccelerationMode::TargetYear { year: 2036 },
        as_of: december,
        limits: SimulationLimits::default(),
    })
    .unwrap();
    assert!(out.result.already_meets_target);
    assert_eq!(out.result.required_extra_payment, Some(Decimal::ZERO));
    assert_eq!(out.result.baseline.months, 120);
    assert_eq!(out.result.baseline.end_date, standard.payoff_date);
}

#[test]
fn test_target_unreachable_within_month_cap() {
    // RAP at this income pays less than the first month's interest, so even
    // paying the full principal as extra leaves a balance after one month.
    let mut input = federal(
        RepaymentPlan::Rap,
        AccelerationMode::TargetYear { year: 2034 },
        Some(modest_income()),
    );
    input.limits = SimulationLimits {
        max_months: 1,
        ..SimulationLimits::default()
    };
    let err = accelerate_federal(&input).unwrap_err();
    match err {
        PayoffError::UnreachableTarget { target_year, earliest_possible } => {
            assert_eq!(target_year, 2034);
            assert_eq!(earliest_possible, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_far_future_target_is_already_met() {
    let out = accelerate_federal(&federal(
        RepaymentPlan::Standard,
        AccelerationMode::TargetYear { year: 400_000_000 },
        None,
    ))
    .unwrap();
    assert!(out.result.already_meets_target);
    assert_eq!(out.result.required_extra_payment, Some(Decimal::ZERO));
}

#[test]
fn test_target_in_past_rejected() {
    let err = accelerate_federal(&federal(
        RepaymentPlan::Standard,
        AccelerationMode::TargetYear { year: 2025 },
        None,
    ))
    .unwrap_err();
    assert_eq!(err.kind(), payoff_core::error::ErrorKind::TargetNotInFuture);
}

#[test]
fn test_private_target_year() {
    let out = accelerate_private(&PrivateAccelerationInput {
        loans: vec![
            Loan::private(dec!(10000), dec!(8), dec!(10)),
            Loan::private(dec!(5000), dec!(5), dec!(10)),
        ],
        mode: AccelerationMode::TargetYear { year: 2030 },
        as_of: as_of(),
        limits: SimulationLimits::default(),
    })
    .unwrap();
    let r = &out.result;
    let required = r.required_extra_payment.unwrap();
    assert!(required > Decimal::ZERO);
    assert!(r.accelerated.end_date.year() <= 2030);
    assert_eq!(r.accelerated.monthly_payment, dec!(174.37) + required);
}

#[test]
fn test_idr_target_ignores_forgiveness() {
    let out = accelerate_federal(&federal(
        RepaymentPlan::Rap,
        AccelerationMode::TargetYear { year: 2034 },
        Some(modest_income()),
    ))
    .unwrap();
    let r = &out.result;
    assert!(!r.already_meets_target);
    assert!(r.accelerated.forgiveness_date.is_none());
    assert!(r.accelerated.end_date.year() <= 2034);
    assert!(r.paid_off_before_forgiveness);
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_savings_monotonic_in_extra(low in 1i64..500, bump in 1i64..500) {
        let run = |extra: i64| {
            accelerate_federal(&federal(
                RepaymentPlan::Standard,
                AccelerationMode::ExtraPayment { amount: Decimal::from(extra) },
                None,
            ))
            .unwrap()
            .result
        };
        let smaller = run(low);
        let larger = run(low + bump);
        prop_assert!(smaller.savings.interest_saved > Decimal::ZERO);
        prop_assert!(larger.savings.months_saved >= smaller.savings.months_saved);
        prop_assert!(larger.savings.interest_saved >= smaller.savings.interest_saved);
    }

    #[test]
    fn prop_solved_extra_meets_target(year in 2028i32..2036) {
        let out = accelerate_federal(&federal(
            RepaymentPlan::Standard,
            AccelerationMode::TargetYear { year },
            None,
        ))
        .unwrap();
        prop_assert!(out.result.accelerated.end_date.year() <= year);
        prop_assert!(out.result.required_extra_payment.unwrap() > Decimal::ZERO);
    }

    #[test]
    fn prop_reported_payoff_year_is_already_met(
        balance_cents in 500_000i64..20_000_000,
        rate_bps in 100i64..1200,
        start_month in 1u32..=12,
    ) {
        let start = NaiveDate::from_ymd_opt(2026, start_month, 1).unwrap();
        let loans = vec![Loan::federal(
            Decimal::new(balance_cents, 2),
            Decimal::new(rate_bps, 2),
            OriginationEra::From2014To2026,
        )];
        let plans = calculate_federal_plans(&FederalPlansInput {
            loans: loans.clone(),
            profile: None,
            intent: BorrowingIntent::No,
            as_of: start,
            limits: SimulationLimits::default(),
        })
        .unwrap();

        for plan in plans.result.plans.iter().filter(|p| !p.is_income_driven) {
            let out = accelerate_federal(&FederalAccelerationInput {
                loans: loans.clone(),
                profile: None,
                intent: BorrowingIntent::No,
                plan: plan.plan,
                mode: AccelerationMode::TargetYear { year: plan.payoff_date.year() },
                as_of: start,
                limits: SimulationLimits::default(),
            })
            .unwrap();
            prop_assert!(out.result.already_meets_target, "{:?} missed its own payoff year", plan.plan);
            prop_assert_eq!(out.result.required_extra_payment, Some(Decimal::ZERO));
        }
    }
}
