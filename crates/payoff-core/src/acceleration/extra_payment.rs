use rust_decimal::Decimal;

use crate::error::PayoffError;
use crate::types::Money;
use crate::PayoffResult;

use super::scenario::{AccelerationResult, PayoffScenario};

/// Add a fixed `extra` to every scheduled payment and compare with the
/// baseline.
pub fn accelerate_with_extra(
    scenario: &impl PayoffScenario,
    extra: Money,
) -> PayoffResult<AccelerationResult> {
    if extra <= Decimal::ZERO {
        return Err(PayoffError::InvalidExtraPayment(extra));
    }
    let baseline = scenario.simulate(Decimal::ZERO)?;
    let accelerated = scenario.simulate(extra)?;
    log::debug!(
        "extra {extra}: {} -> {} months, interest {} -> {}",
        baseline.months,
        accelerated.months,
        baseline.total_interest,
        accelerated.total_interest
    );
    Ok(AccelerationResult::compare(scenario, baseline, accelerated, None, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceleration::scenario::{FederalScenario, PrivateScenario};
    use crate::amortization::PaymentProfile;
    use crate::federal::plans::{PlanTerms, RepaymentPlan};
    use crate::loans::Loan;
    use crate::types::SimulationLimits;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    fn standard() -> FederalScenario {
        FederalScenario {
            plan: RepaymentPlan::Standard,
            balance: dec!(30000),
            monthly_rate: dec!(0.055) / dec!(12),
            terms: PlanTerms {
                payment: PaymentProfile::level(dec!(325.58)),
                term_months: Some(120),
                forgiveness_after_months: None,
            },
            as_of: as_of(),
            limits: SimulationLimits::default(),
        }
    }

    #[test]
    fn test_rejects_non_positive_extra() {
        for extra in [Decimal::ZERO, dec!(-5)] {
            let err = accelerate_with_extra(&standard(), extra).unwrap_err();
            assert!(matches!(err, PayoffError::InvalidExtraPayment(_)));
        }
    }

    #[test]
    fn test_extra_shortens_federal_plan() {
        let result = accelerate_with_extra(&standard(), dec!(200)).unwrap();
        assert_eq!(result.baseline.months, 120);
        assert_eq!(result.accelerated.monthly_payment, dec!(525.58));
        assert!(result.accelerated.months < 120);
        assert!(result.savings.interest_saved > Decimal::ZERO);
        assert_eq!(result.required_extra_payment, None);
        assert!(!result.paid_off_before_forgiveness);
    }

    #[test]
    fn test_extra_on_private_loans_runs_avalanche() {
        let loans = vec![
            Loan::private(dec!(10000), dec!(8), dec!(10)),
            Loan::private(dec!(5000), dec!(5), dec!(10)),
        ];
        let scenario = PrivateScenario {
            loans: &loans,
            as_of: as_of(),
            limits: SimulationLimits::default(),
        };
        let result = accelerate_with_extra(&scenario, dec!(100)).unwrap();
        assert_eq!(result.baseline.months, 120);
        assert_eq!(result.baseline.monthly_payment, dec!(174.37));
        assert_eq!(result.accelerated.monthly_payment, dec!(274.37));
        assert!(result.savings.months_saved > 0);
    }
}
