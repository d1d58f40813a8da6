pub mod accelerate;
pub mod extra_payment;
pub mod scenario;
pub mod target_year;

pub use accelerate::{
    accelerate_federal, accelerate_private, AccelerationMode, FederalAccelerationInput,
    PrivateAccelerationInput,
};
pub use extra_payment::accelerate_with_extra;
pub use scenario::{
    AccelerationResult, FederalScenario, PayoffScenario, PrivateScenario, Savings, ScenarioSummary,
};
pub use target_year::solve_target_year;
