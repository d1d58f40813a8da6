use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use payoff_core::acceleration::{
    accelerate_federal, accelerate_private, AccelerationMode, FederalAccelerationInput,
    PrivateAccelerationInput,
};

use crate::input;

/// Arguments shared by both acceleration commands
#[derive(Args)]
pub struct AccelerateArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Pay this much extra every month (overrides the input's mode)
    #[arg(long, conflicts_with = "target_year")]
    pub extra: Option<Decimal>,

    /// Solve for the extra payment that retires the debt by this year
    #[arg(long)]
    pub target_year: Option<i32>,
}

impl AccelerateArgs {
    fn mode(&self) -> Option<AccelerationMode> {
        match (self.extra, self.target_year) {
            (Some(amount), _) => Some(AccelerationMode::ExtraPayment { amount }),
            (None, Some(year)) => Some(AccelerationMode::TargetYear { year }),
            (None, None) => None,
        }
    }

    fn apply(&self, map: &mut Map<String, Value>) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mode) = self.mode() {
            map.insert("mode".into(), serde_json::to_value(mode)?);
        }
        if !map.contains_key("mode") {
            return Err("--extra or --target-year is required (or set mode in the input)".into());
        }
        Ok(())
    }
}

pub fn run_accelerate_federal(
    args: AccelerateArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let federal_input: FederalAccelerationInput =
        input::load(args.input.as_deref(), as_of, |map| args.apply(map))?;
    let result = accelerate_federal(&federal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_accelerate_private(
    args: AccelerateArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let private_input: PrivateAccelerationInput =
        input::load(args.input.as_deref(), as_of, |map| args.apply(map))?;
    let result = accelerate_private(&private_input)?;
    Ok(serde_json::to_value(result)?)
}
