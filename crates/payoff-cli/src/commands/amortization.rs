use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::amortization::schedule::{build_amortization_schedule, AmortizationInput};
use payoff_core::SimulationLimits;

use crate::input;

/// Arguments for a single-loan amortization table
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate in percent, e.g. 5.5
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term to amortize over, in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Explicit monthly payment instead of the amortized one
    #[arg(long)]
    pub payment: Option<Decimal>,
}

pub fn run_amortize(
    args: AmortizeArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let amortization_input: AmortizationInput = if args.input.is_none() && args.balance.is_some() {
        AmortizationInput {
            balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term_months,
            monthly_payment: args.payment,
            as_of,
            limits: SimulationLimits::default(),
        }
    } else {
        input::load(args.input.as_deref(), as_of, |_| Ok(()))?
    };

    let result = build_amortization_schedule(&amortization_input)?;
    Ok(serde_json::to_value(result)?)
}
