use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoffError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Non-amortizing payment: {payment} does not cover accruing interest of {interest}")]
    NonAmortizingPayment { payment: Decimal, interest: Decimal },

    #[error("Payoff not reached: balance of {remaining_balance} remains after {months} months")]
    PayoffNotReached {
        months: u32,
        remaining_balance: Decimal,
    },

    #[error("Invalid extra payment: {0} must be greater than zero")]
    InvalidExtraPayment(Decimal),

    #[error("Target year {target_year} is not after the current year {current_year}")]
    TargetNotInFuture { target_year: i32, current_year: i32 },

    #[error("Target year {target_year} is unreachable; earliest possible payoff is {earliest_possible}")]
    UnreachableTarget {
        target_year: i32,
        earliest_possible: NaiveDate,
    },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Stable tag for each error variant, handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NonAmortizingPayment,
    PayoffNotReached,
    InvalidExtraPayment,
    TargetNotInFuture,
    UnreachableTarget,
    DateError,
    SerializationError,
}

impl PayoffError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayoffError::InvalidInput { .. } => ErrorKind::InvalidInput,
            PayoffError::NonAmortizingPayment { .. } => ErrorKind::NonAmortizingPayment,
            PayoffError::PayoffNotReached { .. } => ErrorKind::PayoffNotReached,
            PayoffError::InvalidExtraPayment(_) => ErrorKind::InvalidExtraPayment,
            PayoffError::TargetNotInFuture { .. } => ErrorKind::TargetNotInFuture,
            PayoffError::UnreachableTarget { .. } => ErrorKind::UnreachableTarget,
            PayoffError::DateError(_) => ErrorKind::DateError,
            PayoffError::SerializationError(_) => ErrorKind::SerializationError,
        }
    }
}

impl From<serde_json::Error> for PayoffError {
    fn from(e: serde_json::Error) -> Self {
        PayoffError::SerializationError(e.to_string())
    }
}
