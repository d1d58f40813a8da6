pub mod avalanche;

pub use avalanche::{
    calculate_avalanche, minimum_payments, simulate_avalanche, simulate_minimum_payments,
    AvalancheInput, AvalancheMonth, AvalancheOutcome, LoanMonth, LoanPayoff, PayoffStrategy,
};
