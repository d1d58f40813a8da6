use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::private::{calculate_avalanche, AvalancheInput};

use crate::input;

/// Arguments for the debt avalanche
#[derive(Args)]
pub struct AvalancheArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Extra monthly payment (overrides the input file)
    #[arg(long)]
    pub extra: Option<Decimal>,
}

pub fn run_avalanche(
    args: AvalancheArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let avalanche_input: AvalancheInput = input::load(args.input.as_deref(), as_of, |map| {
        if let Some(extra) = args.extra {
            map.insert("extra_payment".into(), serde_json::to_value(extra)?);
        }
        Ok(())
    })?;
    let result = calculate_avalanche(&avalanche_input)?;
    Ok(serde_json::to_value(result)?)
}
