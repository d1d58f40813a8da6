pub mod payment;
pub mod schedule;

pub use payment::{amortized_payment, graduated_initial_payment};
pub use schedule::{simulate_schedule, PaymentProfile, Schedule, ScheduleStep, ScheduleSummary};
