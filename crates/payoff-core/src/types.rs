use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PayoffError;
use crate::PayoffResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest schedule any simulation will run.
pub const MAX_SIMULATION_MONTHS: u32 = 600;
pub const MAX_BISECTION_ITERATIONS: u32 = 40;
/// Finest bisection bracket: one cent.
pub const MIN_TOLERANCE: Money = dec!(0.01);

/// Iteration caps shared by every simulation and solver. Deserialized values
/// are clamped into the ceilings above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequestedLimits")]
pub struct SimulationLimits {
    /// Hard cap on simulated months; a schedule never runs past it.
    pub max_months: u32,
    /// Hard cap on bisection steps in the target-year solver.
    pub max_bisection_iterations: u32,
    /// Width of the bracket at which bisection stops.
    pub tolerance: Money,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_months: MAX_SIMULATION_MONTHS,
            max_bisection_iterations: MAX_BISECTION_ITERATIONS,
            tolerance: MIN_TOLERANCE,
        }
    }
}

impl SimulationLimits {
    /// Same limits, forced into `1..=MAX_SIMULATION_MONTHS` months,
    /// `1..=MAX_BISECTION_ITERATIONS` steps and at least a one-cent tolerance.
    pub fn clamped(&self) -> Self {
        Self {
            max_months: self.max_months.clamp(1, MAX_SIMULATION_MONTHS),
            max_bisection_iterations: self
                .max_bisection_iterations
                .clamp(1, MAX_BISECTION_ITERATIONS),
            tolerance: self.tolerance.max(MIN_TOLERANCE),
        }
    }
}

/// Wire form of [`SimulationLimits`]; every field is optional.
#[derive(Deserialize)]
#[serde(default)]
struct RequestedLimits {
    max_months: u32,
    max_bisection_iterations: u32,
    tolerance: Money,
}

impl Default for RequestedLimits {
    fn default() -> Self {
        let limits = SimulationLimits::default();
        Self {
            max_months: limits.max_months,
            max_bisection_iterations: limits.max_bisection_iterations,
            tolerance: limits.tolerance,
        }
    }
}

impl From<RequestedLimits> for SimulationLimits {
    fn from(requested: RequestedLimits) -> Self {
        SimulationLimits {
            max_months: requested.max_months,
            max_bisection_iterations: requested.max_bisection_iterations,
            tolerance: requested.tolerance,
        }
        .clamped()
    }
}

/// A month count split into whole years and leftover months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearsAndMonths {
    pub years: u32,
    pub months: u32,
}

impl YearsAndMonths {
    pub fn from_months(total: u32) -> Self {
        Self {
            years: total / MONTHS_PER_YEAR,
            months: total % MONTHS_PER_YEAR,
        }
    }
}

/// Round to cents, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round up to the next cent.
pub fn ceil_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
}

/// Date of the `months`-th monthly payment after `start`.
pub fn add_months(start: NaiveDate, months: u32) -> PayoffResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| PayoffError::DateError(format!("{start} + {months} months is out of range")))
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no timing data: identical
/// inputs serialize to identical outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
