//! Scenarios the acceleration engine and target-year solver run against.
//!
//! A [`PayoffScenario`] answers one question: what happens if the borrower
//! pays `extra` on top of the scheduled payment every month? Federal plans
//! answer it with a single aggregate schedule, private loans with the
//! avalanche simulator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{Schedule, ScheduleSummary};
use crate::error::PayoffError;
use crate::federal::plans::{PlanTerms, RepaymentPlan};
use crate::loans::Loan;
use crate::private::{simulate_avalanche, simulate_minimum_payments, AvalancheOutcome};
use crate::types::{add_months, Money, Rate, SimulationLimits, YearsAndMonths};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Output Types
// ---------------------------------------------------------------------------

/// Outcome of one payment scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// First month's total payment, extra included.
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub months: u32,
    /// Payoff date, or the forgiveness date when the balance is forgiven.
    pub end_date: NaiveDate,
    pub forgiveness_date: Option<NaiveDate>,
    pub forgiven_balance: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub interest_saved: Money,
    pub months_saved: u32,
    pub years: u32,
    pub months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationResult {
    pub baseline: ScenarioSummary,
    pub accelerated: ScenarioSummary,
    pub savings: Savings,
    /// Solved extra payment in target-year mode.
    pub required_extra_payment: Option<Money>,
    pub already_meets_target: bool,
    pub paid_off_before_forgiveness: bool,
}

impl AccelerationResult {
    pub(crate) fn compare(
        scenario: &impl PayoffScenario,
        baseline: ScenarioSummary,
        accelerated: ScenarioSummary,
        required_extra_payment: Option<Money>,
        already_meets_target: bool,
    ) -> Self {
        let months_saved = baseline.months.saturating_sub(accelerated.months);
        let span = YearsAndMonths::from_months(months_saved);
        let paid_off_before_forgiveness = scenario.forgiveness_horizon().is_some_and(|horizon| {
            baseline.forgiveness_date.is_some()
                && accelerated.forgiveness_date.is_none()
                && accelerated.months < horizon
        });

        Self {
            savings: Savings {
                interest_saved: baseline.total_interest - accelerated.total_interest,
                months_saved,
                years: span.years,
                months: span.months,
            },
            baseline,
            accelerated,
            required_extra_payment,
            already_meets_target,
            paid_off_before_forgiveness,
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario seam
// ---------------------------------------------------------------------------

pub trait PayoffScenario {
    fn as_of(&self) -> NaiveDate;

    /// Balance owed today; upper bound of the target-year search.
    fn principal(&self) -> Money;

    /// Months after which an unpaid balance is forgiven, if ever.
    fn forgiveness_horizon(&self) -> Option<u32> {
        None
    }

    /// Simulate paying `extra` each month on top of the schedule.
    fn simulate(&self, extra: Money) -> PayoffResult<ScenarioSummary>;

    /// Month of full payoff when paying `extra`, ignoring any forgiveness.
    /// `None` when the month cap is reached first.
    fn payoff_months(&self, extra: Money) -> PayoffResult<Option<u32>>;
}

/// One federal plan applied to the aggregate federal balance.
#[derive(Debug, Clone)]
pub struct FederalScenario {
    pub plan: RepaymentPlan,
    pub balance: Money,
    pub monthly_rate: Rate,
    pub terms: PlanTerms,
    pub as_of: NaiveDate,
    pub limits: SimulationLimits,
}

impl FederalScenario {
    fn schedule(&self, extra: Money, cap: u32) -> Schedule {
        self.terms
            .schedule(self.balance, self.monthly_rate)
            .with_extra(extra)
            .capped_at(cap)
    }
}

impl PayoffScenario for FederalScenario {
    fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn principal(&self) -> Money {
        self.balance
    }

    fn forgiveness_horizon(&self) -> Option<u32> {
        self.terms.forgiveness_after_months
    }

    fn simulate(&self, extra: Money) -> PayoffResult<ScenarioSummary> {
        let first_payment = self.terms.payment.first_payment() + extra;
        match self.terms.forgiveness_after_months {
            Some(horizon) => {
                let summary = self.schedule(extra, horizon.min(self.limits.max_months)).summarize();
                if summary.paid_off {
                    return summarize_payoff(first_payment, &summary, self.as_of);
                }
                let forgiven_on = add_months(self.as_of, summary.months)?;
                Ok(ScenarioSummary {
                    monthly_payment: first_payment,
                    total_paid: summary.total_paid,
                    total_interest: summary.total_interest,
                    months: summary.months,
                    end_date: forgiven_on,
                    forgiveness_date: Some(forgiven_on),
                    forgiven_balance: summary.remaining_balance,
                })
            }
            None => {
                let summary = self.schedule(extra, self.limits.max_months).payoff()?;
                summarize_payoff(first_payment, &summary, self.as_of)
            }
        }
    }

    fn payoff_months(&self, extra: Money) -> PayoffResult<Option<u32>> {
        let summary = self.schedule(extra, self.limits.max_months).summarize();
        Ok(summary.paid_off.then_some(summary.months))
    }
}

/// Private loans: minimums only as the baseline, avalanche with any extra.
#[derive(Debug, Clone, Copy)]
pub struct PrivateScenario<'a> {
    pub loans: &'a [Loan],
    pub as_of: NaiveDate,
    pub limits: SimulationLimits,
}

impl PrivateScenario<'_> {
    fn run(&self, extra: Money) -> PayoffResult<AvalancheOutcome> {
        if extra.is_zero() {
            simulate_minimum_payments(self.loans, self.as_of, &self.limits)
        } else {
            simulate_avalanche(self.loans, extra, self.as_of, &self.limits)
        }
    }
}

impl PayoffScenario for PrivateScenario<'_> {
    fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn principal(&self) -> Money {
        self.loans.iter().map(|l| l.balance).sum()
    }

    fn simulate(&self, extra: Money) -> PayoffResult<ScenarioSummary> {
        let outcome = self.run(extra)?;
        Ok(ScenarioSummary {
            monthly_payment: outcome.total_minimum_payment + extra,
            total_paid: outcome.total_paid,
            total_interest: outcome.total_interest,
            months: outcome.months,
            end_date: outcome.payoff_date,
            forgiveness_date: None,
            forgiven_balance: Decimal::ZERO,
        })
    }

    fn payoff_months(&self, extra: Money) -> PayoffResult<Option<u32>> {
        match self.run(extra) {
            Ok(outcome) => Ok(Some(outcome.months)),
            Err(PayoffError::PayoffNotReached { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn summarize_payoff(
    monthly_payment: Money,
    summary: &ScheduleSummary,
    as_of: NaiveDate,
) -> PayoffResult<ScenarioSummary> {
    Ok(ScenarioSummary {
        monthly_payment,
        total_paid: summary.total_paid,
        total_interest: summary.total_interest,
        months: summary.months,
        end_date: add_months(as_of, summary.months)?,
        forgiveness_date: None,
        forgiven_balance: Decimal::ZERO,
    })
}
