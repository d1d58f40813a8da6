//! Minimal extra payment that retires the debt within a target year.
//!
//! Payoff month is non-increasing in the extra payment, so bisection over
//! `[0, principal]` converges on the smallest sufficient amount.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::PayoffError;
use crate::types::{add_months, ceil_cents, Money, SimulationLimits, MONTHS_PER_YEAR};
use crate::PayoffResult;

use super::scenario::{AccelerationResult, PayoffScenario};

pub fn solve_target_year(
    scenario: &impl PayoffScenario,
    target_year: i32,
    limits: &SimulationLimits,
) -> PayoffResult<AccelerationResult> {
    let limits = limits.clamped();
    let as_of = scenario.as_of();
    if target_year <= as_of.year() {
        return Err(PayoffError::TargetNotInFuture {
            target_year,
            current_year: as_of.year(),
        });
    }
    let deadline = months_until_year_end(as_of, target_year, limits.max_months);
    let meets = |extra: Money| -> PayoffResult<bool> {
        Ok(scenario.payoff_months(extra)?.is_some_and(|m| m <= deadline))
    };

    let baseline = scenario.simulate(Decimal::ZERO)?;
    if meets(Decimal::ZERO)? {
        log::debug!("baseline already retires the debt by {target_year}");
        return Ok(AccelerationResult::compare(
            scenario,
            baseline.clone(),
            baseline,
            Some(Decimal::ZERO),
            true,
        ));
    }

    let mut lo = Decimal::ZERO;
    let mut hi = scenario.principal();
    if !meets(hi)? {
        let earliest_possible = match scenario.payoff_months(hi)? {
            Some(months) => add_months(as_of, months)?,
            None => add_months(as_of, limits.max_months)?,
        };
        return Err(PayoffError::UnreachableTarget {
            target_year,
            earliest_possible,
        });
    }

    let mut iterations = 0u32;
    while hi - lo > limits.tolerance && iterations < limits.max_bisection_iterations {
        let mid = (lo + hi) / Decimal::TWO;
        if meets(mid)? {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
        log::debug!("bisection {iterations}: [{lo}, {hi}]");
    }
    if hi - lo > limits.tolerance {
        log::warn!("bisection stopped after {iterations} iterations with bracket [{lo}, {hi}]");
    }

    // Rounded up so the solved amount still meets the target.
    let required = ceil_cents(hi);
    let accelerated = scenario.simulate(required)?;
    Ok(AccelerationResult::compare(
        scenario,
        baseline,
        accelerated,
        Some(required),
        false,
    ))
}

/// Months from `as_of` to the last payment date that falls in `target_year`,
/// clamped to `cap`.
fn months_until_year_end(as_of: NaiveDate, target_year: i32, cap: u32) -> u32 {
    let years = (i64::from(target_year) - i64::from(as_of.year())).max(0);
    let months =
        years * i64::from(MONTHS_PER_YEAR) + i64::from(MONTHS_PER_YEAR - as_of.month());
    u32::try_from(months.min(i64::from(cap))).unwrap_or(cap)
}
