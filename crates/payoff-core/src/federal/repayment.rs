use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loans::{
    total_federal_balance, validate_loans, weighted_average_rate, BorrowingIntent, FinancialProfile,
    Loan, LoanCategory,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SimulationLimits};
use crate::PayoffResult;

use super::eligibility::{resolve_eligibility, EligibilityOutcome};
use super::plans::{evaluate_plan, PlanContext, PlanResult};

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalPlansInput {
    pub loans: Vec<Loan>,
    /// Required for income-driven plans; without it they are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<FinancialProfile>,
    #[serde(default)]
    pub intent: BorrowingIntent,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub limits: SimulationLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalPlansOutput {
    pub total_balance: Money,
    /// Annual decimal rate.
    pub weighted_average_rate: Rate,
    pub eligibility: EligibilityOutcome,
    /// Evaluated plans in catalog order.
    pub plans: Vec<PlanResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub intent: BorrowingIntent,
    pub as_of: NaiveDate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate every plan the borrower is eligible for.
pub fn calculate_federal_plans(
    input: &FederalPlansInput,
) -> PayoffResult<ComputationOutput<FederalPlansOutput>> {
    let (output, warnings) = evaluate_federal_plans(input)?;

    Ok(with_metadata(
        "Federal repayment plans: eligibility by origination era and borrowing intent; \
         fixed-term formula for level plans, simulation to the forgiveness horizon for IDR",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "intent": input.intent,
            "poverty_guideline_year": super::poverty::GUIDELINE_YEAR,
            "max_months": input.limits.max_months,
        }),
        warnings,
        output,
    ))
}

/// Eligible plan set only, without valuing any plan.
pub fn check_eligibility(
    input: &EligibilityInput,
) -> PayoffResult<ComputationOutput<EligibilityOutcome>> {
    validate_loans(&input.loans, LoanCategory::Federal)?;
    let outcome = resolve_eligibility(&input.loans, input.intent, input.as_of);

    let mut warnings = Vec::new();
    if outcome.contamination_warning {
        warnings.push(contamination_notice());
    }

    Ok(with_metadata(
        "Eligibility by origination era, borrowing intent and plan sunset dates",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "intent": input.intent,
        }),
        warnings,
        outcome,
    ))
}

/// Shared by the plan, refinance and acceleration entry points.
pub(crate) fn evaluate_federal_plans(
    input: &FederalPlansInput,
) -> PayoffResult<(FederalPlansOutput, Vec<String>)> {
    validate_loans(&input.loans, LoanCategory::Federal)?;

    let mut warnings: Vec<String> = Vec::new();
    let total_balance = total_federal_balance(&input.loans);
    let annual_rate = weighted_average_rate(&input.loans);
    let eligibility = resolve_eligibility(&input.loans, input.intent, input.as_of);

    if eligibility.contamination_warning {
        warnings.push(contamination_notice());
    }

    let ctx = PlanContext {
        profile: input.profile.as_ref(),
        balance: total_balance,
        annual_rate,
    };

    let mut plans = Vec::with_capacity(eligibility.plans.len());
    let mut skipped_idr: Vec<&str> = Vec::new();
    for plan in &eligibility.plans {
        match evaluate_plan(*plan, &ctx, input.as_of, &input.limits)? {
            Some(result) => {
                if let Some(sunset) = result.sunset_date {
                    warnings.push(format!(
                        "{} closes to all borrowers on {sunset}",
                        result.plan_name
                    ));
                }
                plans.push(result);
            }
            None if plan.is_income_driven() => skipped_idr.push(plan.display_name()),
            None => {}
        }
    }
    if !skipped_idr.is_empty() {
        warnings.push(format!(
            "Income-driven plans skipped without a positive income: {}",
            skipped_idr.join(", ")
        ));
    }

    Ok((
        FederalPlansOutput {
            total_balance,
            weighted_average_rate: annual_rate,
            eligibility,
            plans,
        },
        warnings,
    ))
}

fn contamination_notice() -> String {
    "Borrowing again after July 1, 2026 limits all federal loans to RAP and the Standardized Tiered Plan"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::federal::eligibility::BorrowerRegime;
    use crate::federal::plans::RepaymentPlan;
    use crate::loans::OriginationEra;
    use rust_decimal_macros::dec;

    fn input(
        loans: Vec<Loan>,
        profile: Option<FinancialProfile>,
        intent: BorrowingIntent,
    ) -> FederalPlansInput {
        FederalPlansInput {
            loans,
            profile,
            intent,
            as_of: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            limits: SimulationLimits::default(),
        }
    }

    fn profile() -> FinancialProfile {
        FinancialProfile {
            adjusted_gross_income: dec!(60000),
            family_size: 2,
            state_group: Default::default(),
            filing_status: Default::default(),
        }
    }

    #[test]
    fn test_plans_in_catalog_order() {
        let loans = vec![
            Loan::federal(dec!(20000), dec!(5), OriginationEra::Pre2014),
            Loan::federal(dec!(20000), dec!(6), OriginationEra::From2014To2026),
        ];
        let req = input(loans, Some(profile()), BorrowingIntent::No);
        let out = calculate_federal_plans(&req).unwrap();
        let order: Vec<RepaymentPlan> = out.result.plans.iter().map(|p| p.plan).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(out.result.total_balance, dec!(40000));
        assert_eq!(out.result.weighted_average_rate, dec!(0.055));
        assert!(order.contains(&RepaymentPlan::OldIbr));
        assert!(order.contains(&RepaymentPlan::Extended));
    }

    #[test]
    fn test_missing_profile_skips_idr_with_warning() {
        let loans = vec![Loan::federal(dec!(20000), dec!(5), OriginationEra::Pre2014)];
        let out = calculate_federal_plans(&input(loans, None, BorrowingIntent::No)).unwrap();
        assert!(out.result.plans.iter().all(|p| !p.is_income_driven));
        assert!(out.warnings.iter().any(|w| w.contains("Income-driven plans skipped")));
    }

    #[test]
    fn test_contamination_flows_through() {
        let loans = vec![Loan::federal(dec!(20000), dec!(5), OriginationEra::Pre2014)];
        let req = input(loans, Some(profile()), BorrowingIntent::Yes);
        let out = calculate_federal_plans(&req).unwrap();
        assert_eq!(out.result.eligibility.regime, BorrowerRegime::Contaminated);
        assert_eq!(out.result.plans.len(), 2);
        assert!(out.warnings.iter().any(|w| w.contains("RAP")));
    }

    #[test]
    fn test_private_loan_rejected() {
        let loans = vec![Loan::private(dec!(20000), dec!(5), dec!(10))];
        let err = calculate_federal_plans(&input(loans, None, BorrowingIntent::No)).unwrap_err();
        assert!(matches!(err, crate::PayoffError::InvalidInput { .. }));
    }

    #[test]
    fn test_identical_inputs_serialize_identically() {
        let loans = vec![Loan::federal(dec!(35000), dec!(6.8), OriginationEra::From2014To2026)];
        let req = input(loans, Some(profile()), BorrowingIntent::No);
        let a = serde_json::to_string(&calculate_federal_plans(&req).unwrap()).unwrap();
        let b = serde_json::to_string(&calculate_federal_plans(&req).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
