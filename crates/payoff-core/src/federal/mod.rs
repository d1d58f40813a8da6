pub mod eligibility;
pub mod plans;
pub mod poverty;
pub mod repayment;
