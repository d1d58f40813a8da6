//! Month-by-month amortization simulation.
//!
//! A [`Schedule`] is a lazy description of a loan being paid down; iterating
//! it yields one [`ScheduleStep`] per month until the balance reaches zero
//! or the month cap is hit. Iteration can be restarted any number of times.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::error::PayoffError;
use crate::types::{
    add_months, ceil_cents, round_cents, with_metadata, ComputationOutput, Money, Rate,
    SimulationLimits, MONTHS_PER_YEAR,
};
use crate::PayoffResult;

use super::payment::amortized_payment;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the scheduled payment evolves month to month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentProfile {
    /// Same payment every month.
    Level { amount: Money },
    /// Payment grows by `step_growth` every `step_months`, indefinitely.
    Graduated {
        initial: Money,
        step_growth: Rate,
        step_months: u32,
    },
}

impl PaymentProfile {
    pub fn level(amount: Money) -> Self {
        PaymentProfile::Level { amount }
    }

    /// Scheduled payment for the 1-indexed `month_index`.
    pub fn payment_for_month(&self, month_index: u32) -> Money {
        match self {
            PaymentProfile::Level { amount } => *amount,
            PaymentProfile::Graduated {
                initial,
                step_growth,
                step_months,
            } => {
                let step = month_index.saturating_sub(1) / (*step_months).max(1);
                ceil_cents(*initial * (Decimal::ONE + *step_growth).powi(step as i64))
            }
        }
    }

    pub fn first_payment(&self) -> Money {
        self.payment_for_month(1)
    }
}

/// One simulated month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub month_index: u32,
    pub payment: Money,
    pub interest_accrued: Money,
    /// Negative when the payment did not cover the interest.
    pub principal_paid: Money,
    pub remaining_balance: Money,
}

/// Totals of a completed (or capped) simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months: u32,
    pub total_paid: Money,
    pub total_interest: Money,
    pub remaining_balance: Money,
    pub paid_off: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    balance: Money,
    monthly_rate: Rate,
    profile: PaymentProfile,
    extra: Money,
    max_months: u32,
    settle_month: Option<u32>,
}

impl Schedule {
    /// Unchecked schedule; see [`simulate_schedule`] for the validated entry.
    pub fn new(balance: Money, monthly_rate: Rate, profile: PaymentProfile) -> Self {
        Self {
            balance,
            monthly_rate,
            profile,
            extra: Decimal::ZERO,
            max_months: SimulationLimits::default().max_months,
            settle_month: None,
        }
    }

    /// Add a fixed amount on top of every scheduled payment.
    pub fn with_extra(mut self, extra: Money) -> Self {
        self.extra = extra;
        self
    }

    /// Stop after `months` months, e.g. at a forgiveness horizon.
    pub fn capped_at(mut self, months: u32) -> Self {
        self.max_months = months;
        self
    }

    /// Pay everything still owed in month `term`. Per-month cent rounding can
    /// leave a residue after the last amortized payment; it is swept into the
    /// final payment instead of spilling into month `term + 1`.
    pub fn settled_by(mut self, term: u32) -> Self {
        self.settle_month = Some(term);
        self
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }

    pub fn max_months(&self) -> u32 {
        self.max_months
    }

    pub fn payment_for_month(&self, month_index: u32) -> Money {
        self.profile.payment_for_month(month_index) + self.extra
    }

    pub fn iter(&self) -> ScheduleIter<'_> {
        ScheduleIter {
            schedule: self,
            balance: self.balance,
            month: 0,
        }
    }

    /// Fails when the first payment does not exceed the first month's
    /// interest. Interest only shrinks from there, so one check suffices.
    pub fn check_amortizing(&self) -> PayoffResult<()> {
        let interest = round_cents(self.balance * self.monthly_rate);
        let payment = self.payment_for_month(1);
        if payment <= interest {
            return Err(PayoffError::NonAmortizingPayment { payment, interest });
        }
        Ok(())
    }

    /// Run to payoff or to the month cap, whichever comes first.
    pub fn summarize(&self) -> ScheduleSummary {
        let mut summary = ScheduleSummary {
            months: 0,
            total_paid: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            remaining_balance: self.balance,
            paid_off: self.balance <= Decimal::ZERO,
        };
        for step in self.iter() {
            summary.months = step.month_index;
            summary.total_paid += step.payment;
            summary.total_interest += step.interest_accrued;
            summary.remaining_balance = step.remaining_balance;
        }
        summary.paid_off = summary.remaining_balance <= Decimal::ZERO;
        if !summary.paid_off && summary.months == self.max_months {
            log::debug!(
                "schedule stopped at month cap {} with {} outstanding",
                self.max_months,
                summary.remaining_balance
            );
        }
        summary
    }

    /// Like [`Schedule::summarize`], but a balance left at the cap is an error.
    pub fn payoff(&self) -> PayoffResult<ScheduleSummary> {
        let summary = self.summarize();
        if !summary.paid_off {
            log::warn!(
                "payoff not reached within {} months; {} remains",
                summary.months,
                summary.remaining_balance
            );
            return Err(PayoffError::PayoffNotReached {
                months: summary.months,
                remaining_balance: summary.remaining_balance,
            });
        }
        Ok(summary)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = ScheduleStep;
    type IntoIter = ScheduleIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ScheduleIter<'a> {
    schedule: &'a Schedule,
    balance: Money,
    month: u32,
}

impl Iterator for ScheduleIter<'_> {
    type Item = ScheduleStep;

    fn next(&mut self) -> Option<ScheduleStep> {
        if self.balance <= Decimal::ZERO || self.month >= self.schedule.max_months {
            return None;
        }
        self.month += 1;

        let interest = round_cents(self.balance * self.schedule.monthly_rate);
        let due = self.balance + interest;
        let payment = if self.schedule.settle_month.is_some_and(|term| self.month >= term) {
            due
        } else {
            self.schedule.payment_for_month(self.month).min(due).max(Decimal::ZERO)
        };
        self.balance = due - payment;

        Some(ScheduleStep {
            month_index: self.month,
            payment,
            interest_accrued: interest,
            principal_paid: payment - interest,
            remaining_balance: self.balance,
        })
    }
}

/// Validated level-payment schedule. Fails with `NonAmortizingPayment` when
/// the payment can never retire the balance.
pub fn simulate_schedule(
    balance: Money,
    monthly_rate: Rate,
    monthly_payment: Money,
) -> PayoffResult<Schedule> {
    if balance <= Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "balance".into(),
            reason: "Balance must be positive".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if monthly_payment < Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "Payment cannot be negative".into(),
        });
    }
    let schedule = Schedule::new(balance, monthly_rate, PaymentProfile::level(monthly_payment));
    schedule.check_amortizing()?;
    Ok(schedule)
}

// ---------------------------------------------------------------------------
// Stand-alone schedule
// ---------------------------------------------------------------------------

/// Input for a single-loan amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub balance: Money,
    pub annual_rate_percent: Decimal,
    /// Term to amortize over. Ignored when `monthly_payment` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    /// Explicit payment to simulate instead of the amortized one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub limits: SimulationLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub months: u32,
    pub payoff_date: NaiveDate,
    pub total_paid: Money,
    pub total_interest: Money,
    pub schedule: Vec<ScheduleStep>,
}

/// Full month-by-month table for one balance.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> PayoffResult<ComputationOutput<AmortizationOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    let monthly_rate = input.annual_rate_percent / Decimal::from(100 * MONTHS_PER_YEAR);

    let payment = match (input.monthly_payment, input.term_months) {
        (Some(payment), term) => {
            if term.is_some() {
                warnings.push("Both payment and term given; term ignored".into());
            }
            payment
        }
        (None, Some(term)) => amortized_payment(input.balance, monthly_rate, term)?,
        (None, None) => {
            return Err(PayoffError::InvalidInput {
                field: "term_months".into(),
                reason: "Either term_months or monthly_payment is required".into(),
            })
        }
    };

    let mut schedule = simulate_schedule(input.balance, monthly_rate, payment)?
        .capped_at(input.limits.max_months);
    if let (None, Some(term)) = (input.monthly_payment, input.term_months) {
        schedule = schedule.settled_by(term);
    }
    let steps: Vec<ScheduleStep> = schedule.iter().collect();
    let summary = schedule.payoff()?;

    let output = AmortizationOutput {
        monthly_payment: payment,
        months: summary.months,
        payoff_date: add_months(input.as_of, summary.months)?,
        total_paid: summary.total_paid,
        total_interest: summary.total_interest,
        schedule: steps,
    };

    Ok(with_metadata(
        "Level-payment amortization with monthly interest accrual rounded to cents",
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "monthly_payment": payment.to_string(),
            "max_months": input.limits.max_months,
        }),
        warnings,
        output,
    ))
}
