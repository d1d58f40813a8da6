//! Federal repayment plan formulas.
//!
//! Every plan is a variant of the closed [`RepaymentPlan`] set and shares one
//! contract: `(profile, aggregate balance, weighted rate) → PlanTerms`. The
//! terms are then valued into a [`PlanResult`] either with the fixed-term
//! formula (level non-income-driven plans) or by simulation (graduated and
//! income-driven plans, the latter capped at their forgiveness horizon).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{amortized_payment, graduated_initial_payment, PaymentProfile, Schedule};
use crate::loans::FinancialProfile;
use crate::types::{add_months, round_cents, Money, Rate, SimulationLimits, MONTHS_PER_YEAR};
use crate::PayoffResult;

use super::poverty::discretionary_income;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const STANDARD_TERM_MONTHS: u32 = 120;
const EXTENDED_TERM_MONTHS: u32 = 300;
/// Extended repayment needs at least this much federal debt.
const EXTENDED_MIN_BALANCE: Money = dec!(30000);
const GRADUATED_STEP_MONTHS: u32 = 24;
const GRADUATED_STEP_GROWTH: Rate = dec!(0.15);
/// ICR pays the lesser of its income formula and a 12-year amortization.
const ICR_AMORTIZATION_MONTHS: u32 = 144;
/// Upper balance bound (exclusive) and term of each standardized tier.
const STANDARDIZED_TIERS: [(Money, u32); 3] = [
    (dec!(25000), 120),
    (dec!(50000), 180),
    (dec!(100000), 240),
];
const STANDARDIZED_TOP_TIER_MONTHS: u32 = 300;

/// Parameters of an income-driven formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeDrivenFormula {
    /// Share of discretionary income paid per year.
    pub income_share: Rate,
    /// Multiple of the poverty guideline shielded from the formula.
    pub poverty_multiplier: Decimal,
    pub forgiveness_months: u32,
}

const OLD_IBR: IncomeDrivenFormula = IncomeDrivenFormula {
    income_share: dec!(0.15),
    poverty_multiplier: dec!(1.5),
    forgiveness_months: 300,
};
const NEW_IBR: IncomeDrivenFormula = IncomeDrivenFormula {
    income_share: dec!(0.10),
    poverty_multiplier: dec!(2.25),
    forgiveness_months: 240,
};
const PAYE: IncomeDrivenFormula = IncomeDrivenFormula {
    income_share: dec!(0.10),
    poverty_multiplier: dec!(2.25),
    forgiveness_months: 240,
};
const ICR: IncomeDrivenFormula = IncomeDrivenFormula {
    income_share: dec!(0.20),
    poverty_multiplier: dec!(1.0),
    forgiveness_months: 300,
};
const RAP: IncomeDrivenFormula = IncomeDrivenFormula {
    income_share: dec!(0.05),
    poverty_multiplier: dec!(2.25),
    forgiveness_months: 240,
};

// ---------------------------------------------------------------------------
// Plan catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentPlan {
    Standard,
    Graduated,
    Extended,
    OldIbr,
    NewIbr,
    Paye,
    Icr,
    Rap,
    StandardizedTiered,
}

impl RepaymentPlan {
    /// Catalog order; results are always reported in this order.
    pub const ALL: [RepaymentPlan; 9] = [
        RepaymentPlan::Standard,
        RepaymentPlan::Graduated,
        RepaymentPlan::Extended,
        RepaymentPlan::OldIbr,
        RepaymentPlan::NewIbr,
        RepaymentPlan::Paye,
        RepaymentPlan::Icr,
        RepaymentPlan::Rap,
        RepaymentPlan::StandardizedTiered,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            RepaymentPlan::Standard => "10-Year Standard",
            RepaymentPlan::Graduated => "Graduated",
            RepaymentPlan::Extended => "Extended",
            RepaymentPlan::OldIbr => "Old IBR",
            RepaymentPlan::NewIbr => "New IBR",
            RepaymentPlan::Paye => "PAYE",
            RepaymentPlan::Icr => "ICR",
            RepaymentPlan::Rap => "RAP",
            RepaymentPlan::StandardizedTiered => "Standardized Tiered Plan",
        }
    }

    pub fn income_driven_formula(self) -> Option<IncomeDrivenFormula> {
        match self {
            RepaymentPlan::OldIbr => Some(OLD_IBR),
            RepaymentPlan::NewIbr => Some(NEW_IBR),
            RepaymentPlan::Paye => Some(PAYE),
            RepaymentPlan::Icr => Some(ICR),
            RepaymentPlan::Rap => Some(RAP),
            RepaymentPlan::Standard
            | RepaymentPlan::Graduated
            | RepaymentPlan::Extended
            | RepaymentPlan::StandardizedTiered => None,
        }
    }

    pub fn is_income_driven(self) -> bool {
        self.income_driven_formula().is_some()
    }

    /// Hard policy date after which the plan is closed to everyone.
    pub fn sunset_date(self) -> Option<NaiveDate> {
        match self {
            RepaymentPlan::Paye | RepaymentPlan::Icr => NaiveDate::from_ymd_opt(2028, 7, 1),
            _ => None,
        }
    }

    pub fn is_sunset(self, as_of: NaiveDate) -> bool {
        self.sunset_date().is_some_and(|sunset| as_of >= sunset)
    }

    /// Payment terms under this plan, or `None` when the plan cannot apply
    /// (Extended below its balance floor, income-driven plans without a
    /// positive income).
    pub fn terms(self, ctx: &PlanContext<'_>) -> PayoffResult<Option<PlanTerms>> {
        let monthly_rate = ctx.monthly_rate();
        let terms = match self {
            RepaymentPlan::Standard => PlanTerms::fixed_term(
                amortized_payment(ctx.balance, monthly_rate, STANDARD_TERM_MONTHS)?,
                STANDARD_TERM_MONTHS,
            ),
            RepaymentPlan::Graduated => PlanTerms {
                payment: PaymentProfile::Graduated {
                    initial: graduated_initial_payment(
                        ctx.balance,
                        monthly_rate,
                        STANDARD_TERM_MONTHS,
                        GRADUATED_STEP_MONTHS,
                        GRADUATED_STEP_GROWTH,
                    )?,
                    step_growth: GRADUATED_STEP_GROWTH,
                    step_months: GRADUATED_STEP_MONTHS,
                },
                term_months: Some(STANDARD_TERM_MONTHS),
                forgiveness_after_months: None,
            },
            RepaymentPlan::Extended => {
                if ctx.balance < EXTENDED_MIN_BALANCE {
                    return Ok(None);
                }
                PlanTerms::fixed_term(
                    amortized_payment(ctx.balance, monthly_rate, EXTENDED_TERM_MONTHS)?,
                    EXTENDED_TERM_MONTHS,
                )
            }
            RepaymentPlan::StandardizedTiered => {
                let months = standardized_tier_months(ctx.balance);
                PlanTerms::fixed_term(amortized_payment(ctx.balance, monthly_rate, months)?, months)
            }
            RepaymentPlan::OldIbr
            | RepaymentPlan::NewIbr
            | RepaymentPlan::Paye
            | RepaymentPlan::Icr
            | RepaymentPlan::Rap => {
                let Some(profile) = ctx.profile.filter(|p| p.supports_income_driven()) else {
                    return Ok(None);
                };
                let Some(formula) = self.income_driven_formula() else {
                    return Ok(None);
                };
                let mut payment = income_driven_payment(profile, formula);
                if self == RepaymentPlan::Icr {
                    let cap =
                        amortized_payment(ctx.balance, monthly_rate, ICR_AMORTIZATION_MONTHS)?;
                    payment = payment.min(cap);
                }
                PlanTerms {
                    payment: PaymentProfile::level(payment),
                    term_months: None,
                    forgiveness_after_months: Some(formula.forgiveness_months),
                }
            }
        };
        Ok(Some(terms))
    }
}

/// Inputs shared by every plan formula.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub profile: Option<&'a FinancialProfile>,
    /// Aggregate federal balance.
    pub balance: Money,
    /// Weighted average annual rate as a decimal.
    pub annual_rate: Rate,
}

impl PlanContext<'_> {
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / Decimal::from(MONTHS_PER_YEAR)
    }
}

/// Output of a plan formula, before valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTerms {
    pub payment: PaymentProfile,
    pub term_months: Option<u32>,
    pub forgiveness_after_months: Option<u32>,
}

impl PlanTerms {
    fn fixed_term(payment: Money, months: u32) -> Self {
        Self {
            payment: PaymentProfile::level(payment),
            term_months: Some(months),
            forgiveness_after_months: None,
        }
    }

    /// Forgiveness horizon for income-driven terms, otherwise the term.
    pub fn horizon_months(&self) -> Option<u32> {
        self.forgiveness_after_months.or(self.term_months)
    }

    /// Month-by-month schedule for these terms. Fixed-term plans are settled
    /// on their last month so they never outrun the term.
    pub fn schedule(&self, balance: Money, monthly_rate: Rate) -> Schedule {
        let schedule = Schedule::new(balance, monthly_rate, self.payment.clone());
        match (self.term_months, self.forgiveness_after_months) {
            (Some(term), None) => schedule.settled_by(term),
            _ => schedule,
        }
    }
}

/// `discretionary income × share ÷ 12`, floored at zero.
pub fn income_driven_payment(profile: &FinancialProfile, formula: IncomeDrivenFormula) -> Money {
    let discretionary = discretionary_income(profile, formula.poverty_multiplier);
    let monthly = discretionary * formula.income_share / Decimal::from(MONTHS_PER_YEAR);
    round_cents(monthly).max(Decimal::ZERO)
}

pub fn standardized_tier_months(balance: Money) -> u32 {
    STANDARDIZED_TIERS
        .iter()
        .find(|(ceiling, _)| balance < *ceiling)
        .map(|(_, months)| *months)
        .unwrap_or(STANDARDIZED_TOP_TIER_MONTHS)
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Payment shown for a plan: a single number, or a range for graduated plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthlyPayment {
    Fixed {
        amount: Money,
    },
    Varies {
        initial: Money,
        final_payment: Money,
        average: Money,
    },
}

impl MonthlyPayment {
    /// What the borrower pays in the first month.
    pub fn first(&self) -> Money {
        match self {
            MonthlyPayment::Fixed { amount } => *amount,
            MonthlyPayment::Varies { initial, .. } => *initial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub plan: RepaymentPlan,
    pub plan_name: String,
    pub monthly_payment: MonthlyPayment,
    pub total_paid: Money,
    pub total_interest: Money,
    /// When the debt ends, by payoff or by forgiveness.
    pub payoff_date: NaiveDate,
    pub forgiveness_date: Option<NaiveDate>,
    /// Balance cancelled at the forgiveness date; zero when paid off.
    pub forgiven_balance: Money,
    pub months: u32,
    pub is_income_driven: bool,
    pub sunset_date: Option<NaiveDate>,
}

/// Evaluate one plan for the borrower. `Ok(None)` when the plan does not apply.
pub fn evaluate_plan(
    plan: RepaymentPlan,
    ctx: &PlanContext<'_>,
    as_of: NaiveDate,
    limits: &SimulationLimits,
) -> PayoffResult<Option<PlanResult>> {
    let Some(terms) = plan.terms(ctx)? else {
        return Ok(None);
    };
    let monthly_rate = ctx.monthly_rate();

    let result = match (&terms.payment, terms.term_months, terms.forgiveness_after_months) {
        // Level non-income-driven plans: fixed-term formula.
        (PaymentProfile::Level { amount }, Some(term), None) => {
            let total_paid = *amount * Decimal::from(term);
            PlanResult {
                plan,
                plan_name: plan.display_name().to_string(),
                monthly_payment: MonthlyPayment::Fixed { amount: *amount },
                total_paid,
                total_interest: total_paid - ctx.balance,
                payoff_date: add_months(as_of, term)?,
                forgiveness_date: None,
                forgiven_balance: Decimal::ZERO,
                months: term,
                is_income_driven: false,
                sunset_date: plan.sunset_date(),
            }
        }
        // Income-driven: simulate up to the forgiveness horizon.
        (PaymentProfile::Level { amount }, _, Some(horizon)) => {
            let summary = terms
                .schedule(ctx.balance, monthly_rate)
                .capped_at(horizon.min(limits.max_months))
                .summarize();
            let end_date = add_months(as_of, summary.months)?;
            PlanResult {
                plan,
                plan_name: plan.display_name().to_string(),
                monthly_payment: MonthlyPayment::Fixed { amount: *amount },
                total_paid: summary.total_paid,
                total_interest: summary.total_interest,
                payoff_date: end_date,
                forgiveness_date: (!summary.paid_off).then_some(end_date),
                forgiven_balance: if summary.paid_off {
                    Decimal::ZERO
                } else {
                    summary.remaining_balance
                },
                months: summary.months,
                is_income_driven: true,
                sunset_date: plan.sunset_date(),
            }
        }
        // Graduated (and any other varying profile): simulate to payoff.
        (profile, _, _) => {
            let summary = terms
                .schedule(ctx.balance, monthly_rate)
                .capped_at(limits.max_months)
                .payoff()?;
            let average = if summary.months == 0 {
                Decimal::ZERO
            } else {
                round_cents(summary.total_paid / Decimal::from(summary.months))
            };
            PlanResult {
                plan,
                plan_name: plan.display_name().to_string(),
                monthly_payment: MonthlyPayment::Varies {
                    initial: profile.first_payment(),
                    final_payment: profile.payment_for_month(summary.months),
                    average,
                },
                total_paid: summary.total_paid,
                total_interest: summary.total_interest,
                payoff_date: add_months(as_of, summary.months)?,
                forgiveness_date: None,
                forgiven_balance: Decimal::ZERO,
                months: summary.months,
                is_income_driven: plan.is_income_driven(),
                sunset_date: plan.sunset_date(),
            }
        }
    };

    log::debug!(
        "{}: first payment {}, {} months, total paid {}",
        result.plan_name,
        result.monthly_payment.first(),
        result.months,
        result.total_paid
    );
    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::{FilingStatus, StateGroup};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    fn single_filer(agi: Money) -> FinancialProfile {
        FinancialProfile {
            adjusted_gross_income: agi,
            family_size: 1,
            state_group: StateGroup::Contiguous,
            filing_status: FilingStatus::Single,
        }
    }

    fn evaluate(
        plan: RepaymentPlan,
        profile: Option<&FinancialProfile>,
        balance: Money,
        rate: Rate,
    ) -> Option<PlanResult> {
        let ctx = PlanContext {
            profile,
            balance,
            annual_rate: rate,
        };
        evaluate_plan(plan, &ctx, as_of(), &SimulationLimits::default()).unwrap()
    }

    #[test]
    fn test_standard_plan_fixed_term_totals() {
        let result = evaluate(RepaymentPlan::Standard, None, dec!(30000), dec!(0.055)).unwrap();
        assert_eq!(result.monthly_payment, MonthlyPayment::Fixed { amount: dec!(325.58) });
        assert_eq!(result.total_paid, dec!(39069.60));
        assert_eq!(result.total_interest, dec!(9069.60));
        assert_eq!(result.payoff_date, NaiveDate::from_ymd_opt(2036, 10, 1).unwrap());
        assert_eq!(result.forgiveness_date, None);
        assert!(!result.is_income_driven);
    }

    #[test]
    fn test_extended_requires_balance_floor() {
        assert!(evaluate(RepaymentPlan::Extended, None, dec!(29999), dec!(0.05)).is_none());
        let result = evaluate(RepaymentPlan::Extended, None, dec!(30000), dec!(0.05)).unwrap();
        assert_eq!(result.months, 300);
    }

    #[test]
    fn test_standardized_tiers() {
        assert_eq!(standardized_tier_months(dec!(24999.99)), 120);
        assert_eq!(standardized_tier_months(dec!(25000)), 180);
        assert_eq!(standardized_tier_months(dec!(60000)), 240);
        assert_eq!(standardized_tier_months(dec!(100000)), 300);
    }

    #[test]
    fn test_old_ibr_payment() {
        let profile = single_filer(dec!(50000));
        // (50,000 - 1.5 * 15,060) * 15% / 12 = 342.625
        let result =
            evaluate(RepaymentPlan::OldIbr, Some(&profile), dec!(80000), dec!(0.06)).unwrap();
        assert_eq!(result.monthly_payment.first(), dec!(342.63));
        assert!(result.is_income_driven);
    }

    #[test]
    fn test_new_ibr_and_rap_payments() {
        let profile = single_filer(dec!(50000));
        // discretionary at 2.25x: 50,000 - 33,885 = 16,115
        let new_ibr =
            evaluate(RepaymentPlan::NewIbr, Some(&profile), dec!(80000), dec!(0.06)).unwrap();
        assert_eq!(new_ibr.monthly_payment.first(), dec!(134.29));
        let rap =
            evaluate(RepaymentPlan::Rap, Some(&profile), dec!(80000), dec!(0.06)).unwrap();
        assert_eq!(rap.monthly_payment.first(), dec!(67.15));
    }

    #[test]
    fn test_idr_forgiveness_when_payment_is_small() {
        let profile = single_filer(dec!(50000));
        let result =
            evaluate(RepaymentPlan::NewIbr, Some(&profile), dec!(80000), dec!(0.06)).unwrap();
        let forgiveness = result.forgiveness_date.expect("balance should be forgiven");
        assert_eq!(forgiveness, NaiveDate::from_ymd_opt(2046, 10, 1).unwrap());
        assert_eq!(result.payoff_date, forgiveness);
        assert_eq!(result.months, 240);
        assert!(result.forgiven_balance > Decimal::ZERO);
        assert_eq!(
            result.total_paid + result.forgiven_balance,
            dec!(80000) + result.total_interest
        );
    }

    #[test]
    fn test_idr_payoff_before_horizon_for_high_income() {
        let profile = single_filer(dec!(250000));
        let result =
            evaluate(RepaymentPlan::OldIbr, Some(&profile), dec!(20000), dec!(0.05)).unwrap();
        assert_eq!(result.forgiveness_date, None);
        assert!(result.months < 300);
        assert_eq!(result.forgiven_balance, Decimal::ZERO);
        assert_eq!(result.total_paid, dec!(20000) + result.total_interest);
    }

    #[test]
    fn test_idr_requires_positive_income() {
        let broke = single_filer(Decimal::ZERO);
        assert!(evaluate(RepaymentPlan::Rap, Some(&broke), dec!(40000), dec!(0.05)).is_none());
        assert!(evaluate(RepaymentPlan::Rap, None, dec!(40000), dec!(0.05)).is_none());
    }

    #[test]
    fn test_icr_capped_by_twelve_year_amortization() {
        let profile = single_filer(dec!(400000));
        let result =
            evaluate(RepaymentPlan::Icr, Some(&profile), dec!(10000), dec!(0.05)).unwrap();
        let cap = amortized_payment(dec!(10000), dec!(0.05) / dec!(12), 144).unwrap();
        assert_eq!(result.monthly_payment.first(), cap);
    }

    #[test]
    fn test_graduated_reports_varying_payment() {
        let result = evaluate(RepaymentPlan::Graduated, None, dec!(30000), dec!(0.06)).unwrap();
        match result.monthly_payment {
            MonthlyPayment::Varies { initial, final_payment, average } => {
                assert_eq!(initial, dec!(255.37));
                assert!(final_payment > initial);
                assert!(average > initial && average <= final_payment);
            }
            other => panic!("expected varying payment, got {other:?}"),
        }
        assert_eq!(result.months, 120);
        assert_eq!(result.total_paid, dec!(30000) + result.total_interest);
    }

    #[test]
    fn test_sunset_dates() {
        let before = NaiveDate::from_ymd_opt(2028, 6, 30).unwrap();
        let on = NaiveDate::from_ymd_opt(2028, 7, 1).unwrap();
        assert!(!RepaymentPlan::Paye.is_sunset(before));
        assert!(RepaymentPlan::Paye.is_sunset(on));
        assert!(RepaymentPlan::Icr.is_sunset(on));
        assert!(!RepaymentPlan::Rap.is_sunset(on));
    }

    #[test]
    fn test_lower_income_never_ends_earlier() {
        let high = single_filer(dec!(120000));
        let low = single_filer(dec!(90000));
        let fast = evaluate(RepaymentPlan::NewIbr, Some(&high), dec!(40000), dec!(0.05)).unwrap();
        let slow = evaluate(RepaymentPlan::NewIbr, Some(&low), dec!(40000), dec!(0.05)).unwrap();
        assert!(fast.monthly_payment.first() > slow.monthly_payment.first());
        assert!(fast.payoff_date <= slow.payoff_date);
    }
}
