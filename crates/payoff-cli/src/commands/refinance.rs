use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::refinance::{compare_refinance, RefinanceInput};

use crate::input;

/// Arguments for the refinancing comparison
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Offered annual rate in percent (overrides the input file)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Offered term in years (overrides the input file)
    #[arg(long)]
    pub term_years: Option<u32>,
}

pub fn run_refinance(
    args: RefinanceArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let refinance_input: RefinanceInput = input::load(args.input.as_deref(), as_of, |map| {
        if args.rate.is_none() && args.term_years.is_none() {
            return Ok(());
        }
        let offer = map
            .entry("offer")
            .or_insert_with(|| Value::Object(Default::default()));
        let Value::Object(offer) = offer else {
            return Err("offer must be an object".into());
        };
        if let Some(rate) = args.rate {
            offer.insert("annual_rate_percent".into(), serde_json::to_value(rate)?);
        }
        if let Some(years) = args.term_years {
            offer.insert("term_years".into(), Value::from(years));
        }
        Ok(())
    })?;
    let result = compare_refinance(&refinance_input)?;
    Ok(serde_json::to_value(result)?)
}
