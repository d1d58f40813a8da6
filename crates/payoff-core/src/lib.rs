pub mod amortization;
pub mod error;
pub mod loans;
pub mod types;

#[cfg(feature = "federal")]
pub mod federal;

#[cfg(feature = "private")]
pub mod private;

#[cfg(feature = "acceleration")]
pub mod acceleration;

#[cfg(feature = "refinance")]
pub mod refinance;

pub use error::PayoffError;
pub use types::*;

/// Standard result type for all payoff operations
pub type PayoffResult<T> = Result<T, PayoffError>;
