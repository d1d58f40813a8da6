use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayoffError;
use crate::federal::eligibility::resolve_eligibility;
use crate::federal::plans::{PlanContext, RepaymentPlan};
use crate::loans::{
    total_federal_balance, validate_loans, weighted_average_rate, BorrowingIntent, FinancialProfile,
    Loan, LoanCategory,
};
use crate::types::{with_metadata, ComputationOutput, Money, SimulationLimits, MONTHS_PER_YEAR};
use crate::PayoffResult;

use super::extra_payment::accelerate_with_extra;
use super::scenario::{AccelerationResult, FederalScenario, PayoffScenario, PrivateScenario};
use super::target_year::solve_target_year;

// ---------------------------------------------------------------------------
// Input Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AccelerationMode {
    ExtraPayment { amount: Money },
    TargetYear { year: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalAccelerationInput {
    pub loans: Vec<Loan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<FinancialProfile>,
    #[serde(default)]
    pub intent: BorrowingIntent,
    pub plan: RepaymentPlan,
    pub mode: AccelerationMode,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub limits: SimulationLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateAccelerationInput {
    pub loans: Vec<Loan>,
    pub mode: AccelerationMode,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub limits: SimulationLimits,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Accelerate one eligible federal plan on the aggregate federal balance.
pub fn accelerate_federal(
    input: &FederalAccelerationInput,
) -> PayoffResult<ComputationOutput<AccelerationResult>> {
    validate_loans(&input.loans, LoanCategory::Federal)?;

    let eligibility = resolve_eligibility(&input.loans, input.intent, input.as_of);
    if !eligibility.plans.contains(&input.plan) {
        return Err(PayoffError::InvalidInput {
            field: "plan".into(),
            reason: format!("{} is not available for these loans", input.plan.display_name()),
        });
    }

    let ctx = PlanContext {
        profile: input.profile.as_ref(),
        balance: total_federal_balance(&input.loans),
        annual_rate: weighted_average_rate(&input.loans),
    };
    let terms = input.plan.terms(&ctx)?.ok_or_else(|| PayoffError::InvalidInput {
        field: "plan".into(),
        reason: format!("{} does not apply to this balance and profile", input.plan.display_name()),
    })?;

    let scenario = FederalScenario {
        plan: input.plan,
        balance: ctx.balance,
        monthly_rate: ctx.annual_rate / Decimal::from(MONTHS_PER_YEAR),
        terms,
        as_of: input.as_of,
        limits: input.limits.clamped(),
    };
    let result = dispatch(&scenario, input.mode, &input.limits)?;

    let mut warnings: Vec<String> = Vec::new();
    if result.paid_off_before_forgiveness {
        warnings.push(format!(
            "Balance is paid off before {} forgiveness; nothing is forgiven",
            input.plan.display_name()
        ));
    } else if matches!(input.mode, AccelerationMode::TargetYear { .. })
        && result.accelerated.forgiveness_date.is_some()
    {
        warnings.push("Forgiveness arrives before the solved payoff date".into());
    }

    Ok(with_metadata(
        "Federal acceleration: plan payment plus a fixed monthly extra on the aggregate \
         balance at the weighted rate; target years solved by bisection",
        &serde_json::json!({
            "plan": input.plan,
            "mode": input.mode,
            "balance": ctx.balance.to_string(),
            "weighted_average_rate": ctx.annual_rate.to_string(),
            "as_of": input.as_of.to_string(),
            "max_months": input.limits.max_months,
            "max_bisection_iterations": input.limits.max_bisection_iterations,
            "tolerance": input.limits.tolerance.to_string(),
        }),
        warnings,
        result,
    ))
}

/// Minimum-payment baseline against the avalanche.
pub fn accelerate_private(
    input: &PrivateAccelerationInput,
) -> PayoffResult<ComputationOutput<AccelerationResult>> {
    validate_loans(&input.loans, LoanCategory::Private)?;

    let scenario = PrivateScenario {
        loans: &input.loans,
        as_of: input.as_of,
        limits: input.limits.clamped(),
    };
    let result = dispatch(&scenario, input.mode, &input.limits)?;

    Ok(with_metadata(
        "Private acceleration: minimum payments on each loan's own term as the baseline, \
         debt avalanche with cascading minimums as the accelerated schedule",
        &serde_json::json!({
            "loan_count": input.loans.len(),
            "principal": scenario.principal().to_string(),
            "mode": input.mode,
            "as_of": input.as_of.to_string(),
            "max_months": input.limits.max_months,
        }),
        Vec::new(),
        result,
    ))
}

fn dispatch(
    scenario: &impl PayoffScenario,
    mode: AccelerationMode,
    limits: &SimulationLimits,
) -> PayoffResult<AccelerationResult> {
    match mode {
        AccelerationMode::ExtraPayment { amount } => accelerate_with_extra(scenario, amount),
        AccelerationMode::TargetYear { year } => solve_target_year(scenario, year, limits),
    }
}
