use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use payoff_core::federal::repayment::{
    calculate_federal_plans, check_eligibility, EligibilityInput, FederalPlansInput,
};

use crate::input;

/// Arguments for federal plan evaluation
#[derive(Args)]
pub struct PlansArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the eligibility check
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_plans(args: PlansArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let plans_input: FederalPlansInput = input::load(args.input.as_deref(), as_of, |_| Ok(()))?;
    let result = calculate_federal_plans(&plans_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_eligibility(
    args: EligibilityArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let eligibility_input: EligibilityInput =
        input::load(args.input.as_deref(), as_of, |_| Ok(()))?;
    let result = check_eligibility(&eligibility_input)?;
    Ok(serde_json::to_value(result)?)
}
