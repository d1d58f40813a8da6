//! Private refinancing offer versus the borrower's federal plans.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::amortized_payment;
use crate::error::PayoffError;
use crate::federal::plans::{PlanResult, RepaymentPlan};
use crate::federal::repayment::{evaluate_federal_plans, FederalPlansInput};
use crate::loans::{BorrowingIntent, FinancialProfile, Loan};
use crate::types::{
    add_months, with_metadata, ComputationOutput, Money, SimulationLimits, MAX_SIMULATION_MONTHS,
    MONTHS_PER_YEAR,
};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefinanceOffer {
    /// Offered annual rate as entered, e.g. 4.5 for 4.5%.
    pub annual_rate_percent: Decimal,
    pub term_years: u32,
}

/// Which federal plan the offer is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Lowest positive first-month payment.
    #[default]
    LowestPayment,
    LowestTotal,
    Custom { plan: RepaymentPlan },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub loans: Vec<Loan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<FinancialProfile>,
    #[serde(default)]
    pub intent: BorrowingIntent,
    pub offer: RefinanceOffer,
    #[serde(default)]
    pub comparison: ComparisonMode,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub limits: SimulationLimits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceQuote {
    pub monthly_payment: Money,
    pub term_months: u32,
    pub total_paid: Money,
    pub total_interest: Money,
    pub payoff_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceComparison {
    pub refinance: RefinanceQuote,
    /// `None` when no federal plan applies.
    pub federal_plan: Option<PlanResult>,
    /// Federal first-month payment minus the refinanced payment.
    pub monthly_difference: Option<Money>,
    /// Federal total paid minus the refinanced total.
    pub total_difference: Option<Money>,
    /// Refinancing gives up the forgiveness the compared plan offers.
    pub forfeits_forgiveness: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn compare_refinance(
    input: &RefinanceInput,
) -> PayoffResult<ComputationOutput<RefinanceComparison>> {
    validate_offer(&input.offer)?;

    let (federal, mut warnings) = evaluate_federal_plans(&FederalPlansInput {
        loans: input.loans.clone(),
        profile: input.profile.clone(),
        intent: input.intent,
        as_of: input.as_of,
        limits: input.limits,
    })?;

    let refinance = quote(federal.total_balance, &input.offer, input.as_of)?;
    let compared = select_plan(&federal.plans, input.comparison)?;

    if compared.is_none() {
        warnings.push("No federal plan to compare against".into());
    }
    let forfeits_forgiveness = compared.is_some_and(|p| p.is_income_driven);
    if forfeits_forgiveness {
        warnings.push(
            "Refinancing converts federal loans to private: income-driven payments and forgiveness are lost"
                .into(),
        );
    }

    let output = RefinanceComparison {
        monthly_difference: compared.map(|p| p.monthly_payment.first() - refinance.monthly_payment),
        total_difference: compared.map(|p| p.total_paid - refinance.total_paid),
        federal_plan: compared.cloned(),
        forfeits_forgiveness,
        refinance,
    };

    Ok(with_metadata(
        "Refinance: aggregate federal balance amortized at the offered rate and term, \
         compared with the selected federal plan",
        &serde_json::json!({
            "balance": federal.total_balance.to_string(),
            "offer_rate_percent": input.offer.annual_rate_percent.to_string(),
            "offer_term_years": input.offer.term_years,
            "comparison": input.comparison,
            "as_of": input.as_of.to_string(),
        }),
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_offer(offer: &RefinanceOffer) -> PayoffResult<()> {
    if offer.annual_rate_percent < Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "offer.annual_rate_percent".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if offer.term_years == 0 {
        return Err(PayoffError::InvalidInput {
            field: "offer.term_years".into(),
            reason: "Term must be at least one year".into(),
        });
    }
    Ok(())
}

fn quote(balance: Money, offer: &RefinanceOffer, as_of: NaiveDate) -> PayoffResult<RefinanceQuote> {
    let term_months = offer
        .term_years
        .checked_mul(MONTHS_PER_YEAR)
        .filter(|months| *months <= MAX_SIMULATION_MONTHS)
        .ok_or_else(|| PayoffError::InvalidInput {
            field: "offer.term_years".into(),
            reason: format!(
                "Term cannot exceed {} years",
                MAX_SIMULATION_MONTHS / MONTHS_PER_YEAR
            ),
        })?;
    let monthly_rate = offer.annual_rate_percent / Decimal::from(100 * MONTHS_PER_YEAR);
    let monthly_payment = amortized_payment(balance, monthly_rate, term_months)?;
    let total_paid = monthly_payment * Decimal::from(term_months);
    Ok(RefinanceQuote {
        monthly_payment,
        term_months,
        total_paid,
        total_interest: total_paid - balance,
        payoff_date: add_months(as_of, term_months)?,
    })
}

fn select_plan(plans: &[PlanResult], mode: ComparisonMode) -> PayoffResult<Option<&PlanResult>> {
    let selected = match mode {
        ComparisonMode::LowestPayment => plans
            .iter()
            .filter(|p| p.monthly_payment.first() > Decimal::ZERO)
            .fold(None, |best: Option<&PlanResult>, p| match best {
                Some(b) if b.monthly_payment.first() <= p.monthly_payment.first() => Some(b),
                _ => Some(p),
            }),
        ComparisonMode::LowestTotal => {
            plans.iter().fold(None, |best: Option<&PlanResult>, p| match best {
                Some(b) if b.total_paid <= p.total_paid => Some(b),
                _ => Some(p),
            })
        }
        ComparisonMode::Custom { plan } => {
            let found = plans.iter().find(|p| p.plan == plan);
            if found.is_none() {
                return Err(PayoffError::InvalidInput {
                    field: "comparison.plan".into(),
                    reason: format!("{} is not available for these loans", plan.display_name()),
                });
            }
            found
        }
    };
    Ok(selected)
}
