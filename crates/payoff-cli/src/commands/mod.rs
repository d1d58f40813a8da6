pub mod acceleration;
pub mod amortization;
pub mod federal;
pub mod private;
pub mod refinance;
