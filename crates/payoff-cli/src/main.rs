mod commands;
mod input;
mod output;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::acceleration::AccelerateArgs;
use commands::amortization::AmortizeArgs;
use commands::federal::{EligibilityArgs, PlansArgs};
use commands::private::AvalancheArgs;
use commands::refinance::RefinanceArgs;

/// Student loan repayment calculations
#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Student loan repayment calculations",
    long_about = "A CLI for student loan repayment calculations with decimal precision. \
                  Evaluates federal repayment plans and eligibility, amortizes loans, \
                  simulates the debt avalanche, solves extra payments for a target \
                  payoff year, and compares refinancing offers."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Valuation date (YYYY-MM-DD) used when the input has no as_of; defaults to today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every eligible federal repayment plan
    Plans(PlansArgs),
    /// List the federal plans a borrower may choose
    Eligibility(EligibilityArgs),
    /// Month-by-month amortization table for one balance
    Amortize(AmortizeArgs),
    /// Pay off private loans with the debt avalanche
    Avalanche(AvalancheArgs),
    /// Extra payment or target year on a federal plan
    AccelerateFederal(AccelerateArgs),
    /// Extra payment or target year on private loans
    AcceleratePrivate(AccelerateArgs),
    /// Compare a refinancing offer with the federal plans
    Refinance(RefinanceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plans(args) => commands::federal::run_plans(args, as_of),
        Commands::Eligibility(args) => commands::federal::run_eligibility(args, as_of),
        Commands::Amortize(args) => commands::amortization::run_amortize(args, as_of),
        Commands::Avalanche(args) => commands::private::run_avalanche(args, as_of),
        Commands::AccelerateFederal(args) => {
            commands::acceleration::run_accelerate_federal(args, as_of)
        }
        Commands::AcceleratePrivate(args) => {
            commands::acceleration::run_accelerate_private(args, as_of)
        }
        Commands::Refinance(args) => commands::refinance::run_refinance(args, as_of),
        Commands::Version => {
            println!("payoff {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
