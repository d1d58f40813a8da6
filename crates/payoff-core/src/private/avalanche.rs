//! Multi-loan payoff simulation for private loans.
//!
//! Every loan keeps paying its own amortized minimum. Under the avalanche
//! strategy a single extra-payment pool goes to the highest-rate open loan,
//! and the minimum of every retired loan joins the pool from the next month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::amortized_payment;
use crate::error::PayoffError;
use crate::loans::{validate_loans, Loan, LoanCategory};
use crate::types::{
    add_months, round_cents, with_metadata, ComputationOutput, Money, SimulationLimits,
};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStrategy {
    /// Each loan on its own minimum; nothing cascades.
    MinimumOnly,
    /// Extra pool to the highest rate first, retired minimums cascade.
    Avalanche,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvalancheInput {
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub extra_payment: Money,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub limits: SimulationLimits,
}

/// One loan in one simulated month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanMonth {
    pub loan_index: usize,
    pub interest_accrued: Money,
    pub minimum_paid: Money,
    pub extra_paid: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheMonth {
    pub month_index: u32,
    /// Pool available for extra payments this month.
    pub extra_pool: Money,
    pub loans: Vec<LoanMonth>,
    pub total_remaining: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayoff {
    pub loan_index: usize,
    pub annual_rate_percent: Decimal,
    pub minimum_payment: Money,
    pub payoff_month: u32,
    pub payoff_date: NaiveDate,
    pub total_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheOutcome {
    pub strategy: PayoffStrategy,
    pub original_balance: Money,
    pub total_minimum_payment: Money,
    pub extra_payment: Money,
    pub months: u32,
    pub payoff_date: NaiveDate,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Per-loan results in input order.
    pub loans: Vec<LoanPayoff>,
    pub schedule: Vec<AvalancheMonth>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Avalanche payoff across the private loans, wrapped in the output envelope.
pub fn calculate_avalanche(
    input: &AvalancheInput,
) -> PayoffResult<ComputationOutput<AvalancheOutcome>> {
    let mut warnings: Vec<String> = Vec::new();
    if input.extra_payment.is_zero() {
        warnings.push(
            "No extra payment: retired minimums still cascade to the remaining loans".into(),
        );
    }
    let outcome =
        simulate_avalanche(&input.loans, input.extra_payment, input.as_of, &input.limits)?;

    Ok(with_metadata(
        "Debt avalanche: minimums on every loan, extra pool to the highest rate \
         (ties: larger balance, then input order), retired minimums join the pool",
        &serde_json::json!({
            "loan_count": input.loans.len(),
            "extra_payment": input.extra_payment.to_string(),
            "as_of": input.as_of.to_string(),
            "max_months": input.limits.max_months,
        }),
        warnings,
        outcome,
    ))
}

/// Amortized minimum of each loan over its own remaining term.
pub fn minimum_payments(loans: &[Loan]) -> PayoffResult<Vec<Money>> {
    loans
        .iter()
        .map(|loan| amortized_payment(loan.balance, loan.monthly_rate(), loan.term_months()?))
        .collect()
}

pub fn simulate_avalanche(
    loans: &[Loan],
    extra_payment: Money,
    as_of: NaiveDate,
    limits: &SimulationLimits,
) -> PayoffResult<AvalancheOutcome> {
    if extra_payment < Decimal::ZERO {
        return Err(PayoffError::InvalidInput {
            field: "extra_payment".into(),
            reason: "Extra payment cannot be negative".into(),
        });
    }
    simulate(loans, extra_payment, PayoffStrategy::Avalanche, as_of, limits)
}

/// Baseline: every loan on its own minimum until its own payoff.
pub fn simulate_minimum_payments(
    loans: &[Loan],
    as_of: NaiveDate,
    limits: &SimulationLimits,
) -> PayoffResult<AvalancheOutcome> {
    simulate(loans, Decimal::ZERO, PayoffStrategy::MinimumOnly, as_of, limits)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct OpenLoan {
    index: usize,
    monthly_rate: Decimal,
    minimum: Money,
    term_months: u32,
    balance: Money,
    interest: Money,
    payoff_month: Option<u32>,
}

fn simulate(
    loans: &[Loan],
    extra_payment: Money,
    strategy: PayoffStrategy,
    as_of: NaiveDate,
    limits: &SimulationLimits,
) -> PayoffResult<AvalancheOutcome> {
    validate_loans(loans, LoanCategory::Private)?;
    let minimums = minimum_payments(loans)?;

    let mut open: Vec<OpenLoan> = loans
        .iter()
        .zip(&minimums)
        .enumerate()
        .map(|(index, (loan, minimum))| {
            Ok(OpenLoan {
                index,
                monthly_rate: loan.monthly_rate(),
                minimum: *minimum,
                term_months: loan.term_months()?,
                balance: loan.balance,
                interest: Decimal::ZERO,
                payoff_month: None,
            })
        })
        .collect::<PayoffResult<_>>()?;

    let original_balance: Money = loans.iter().map(|l| l.balance).sum();
    let mut schedule: Vec<AvalancheMonth> = Vec::new();
    let mut total_paid = Decimal::ZERO;
    let mut freed = Decimal::ZERO;
    let mut month = 0u32;

    while open.iter().any(|l| l.balance > Decimal::ZERO) {
        if month >= limits.max_months {
            let remaining: Money = open.iter().map(|l| l.balance).sum();
            log::warn!(
                "{strategy:?} payoff not reached within {month} months; {remaining} remains"
            );
            return Err(PayoffError::PayoffNotReached {
                months: month,
                remaining_balance: remaining,
            });
        }
        month += 1;

        let mut pool = match strategy {
            PayoffStrategy::Avalanche => extra_payment + freed,
            PayoffStrategy::MinimumOnly => Decimal::ZERO,
        };
        let extra_pool = pool;

        let mut rows: Vec<LoanMonth> = Vec::with_capacity(open.len());
        for loan in open.iter_mut().filter(|l| l.balance > Decimal::ZERO) {
            let interest = round_cents(loan.balance * loan.monthly_rate);
            loan.interest += interest;
            loan.balance += interest;
            // The last month of a loan's term clears its rounding residue.
            let paid = if month >= loan.term_months {
                loan.balance
            } else {
                loan.minimum.min(loan.balance)
            };
            loan.balance -= paid;
            total_paid += paid;
            rows.push(LoanMonth {
                loan_index: loan.index,
                interest_accrued: interest,
                minimum_paid: paid,
                extra_paid: Decimal::ZERO,
                remaining_balance: loan.balance,
            });
        }

        // Spill the pool down the rate ranking until it is spent.
        for target in avalanche_order(&open) {
            if pool <= Decimal::ZERO {
                break;
            }
            let loan = &mut open[target];
            let paid = pool.min(loan.balance);
            loan.balance -= paid;
            pool -= paid;
            total_paid += paid;
            if let Some(row) = rows.iter_mut().find(|r| r.loan_index == loan.index) {
                row.extra_paid += paid;
                row.remaining_balance = loan.balance;
            }
        }

        for loan in open.iter_mut() {
            if loan.balance <= Decimal::ZERO && loan.payoff_month.is_none() {
                loan.payoff_month = Some(month);
                freed += loan.minimum;
                log::debug!("loan {} retired in month {month}", loan.index);
            }
        }

        schedule.push(AvalancheMonth {
            month_index: month,
            extra_pool,
            total_remaining: open.iter().map(|l| l.balance).sum(),
            loans: rows,
        });
    }

    let mut payoffs = Vec::with_capacity(open.len());
    for (loan, input) in open.iter().zip(loans) {
        let payoff_month = loan.payoff_month.unwrap_or(0);
        payoffs.push(LoanPayoff {
            loan_index: loan.index,
            annual_rate_percent: input.annual_rate_percent,
            minimum_payment: loan.minimum,
            payoff_month,
            payoff_date: add_months(as_of, payoff_month)?,
            total_interest: loan.interest,
        });
    }

    Ok(AvalancheOutcome {
        strategy,
        original_balance,
        total_minimum_payment: minimums.iter().copied().sum(),
        extra_payment,
        months: month,
        payoff_date: add_months(as_of, month)?,
        total_paid,
        total_interest: open.iter().map(|l| l.interest).sum(),
        loans: payoffs,
        schedule,
    })
}

/// Positions of open loans, highest rate first; ties go to the larger
/// remaining balance, then to input order.
fn avalanche_order(open: &[OpenLoan]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..open.len())
        .filter(|i| open[*i].balance > Decimal::ZERO)
        .collect();
    order.sort_by(|a, b| {
        let (a, b) = (&open[*a], &open[*b]);
        b.monthly_rate
            .cmp(&a.monthly_rate)
            .then_with(|| b.balance.cmp(&a.balance))
            .then_with(|| a.index.cmp(&b.index))
    });
    order
}
