//! Borrower inputs: loans, the financial profile, and the aggregates the
//! federal formulas are driven by.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PayoffError;
use crate::types::{Money, Rate, MONTHS_PER_YEAR};
use crate::PayoffResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    Federal,
    Private,
}

/// When the borrower's first federal loan was disbursed, relative to the
/// July 1, 2014 and July 1, 2026 policy cutoffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginationEra {
    #[serde(rename = "pre2014")]
    Pre2014,
    #[serde(rename = "2014_to_2026")]
    From2014To2026,
    #[serde(rename = "post2026")]
    Post2026,
    #[default]
    Unset,
}

impl OriginationEra {
    /// Disbursed before the July 1, 2026 cutoff.
    pub fn is_pre_cutoff(self) -> bool {
        matches!(self, OriginationEra::Pre2014 | OriginationEra::From2014To2026)
    }

    /// Disbursed on or after July 1, 2014.
    pub fn is_post_2014(self) -> bool {
        matches!(self, OriginationEra::From2014To2026 | OriginationEra::Post2026)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub category: LoanCategory,
    pub balance: Money,
    /// Annual rate as entered, e.g. 5.5 for 5.5%.
    pub annual_rate_percent: Decimal,
    /// Federal loans only.
    #[serde(default)]
    pub origination_era: OriginationEra,
    /// Private loans only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_term_years: Option<Decimal>,
}

impl Loan {
    pub fn federal(balance: Money, annual_rate_percent: Decimal, era: OriginationEra) -> Self {
        Self {
            category: LoanCategory::Federal,
            balance,
            annual_rate_percent,
            origination_era: era,
            remaining_term_years: None,
        }
    }

    pub fn private(balance: Money, annual_rate_percent: Decimal, term_years: Decimal) -> Self {
        Self {
            category: LoanCategory::Private,
            balance,
            annual_rate_percent,
            origination_era: OriginationEra::Unset,
            remaining_term_years: Some(term_years),
        }
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(100)
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate() / Decimal::from(MONTHS_PER_YEAR)
    }

    /// Remaining term in whole months, rounded to the nearest month.
    pub fn term_months(&self) -> PayoffResult<u32> {
        let years = self.remaining_term_years.ok_or_else(|| PayoffError::InvalidInput {
            field: "remaining_term_years".into(),
            reason: "Private loans require a remaining term".into(),
        })?;
        let months = (years * Decimal::from(MONTHS_PER_YEAR)).round();
        if months <= Decimal::ZERO {
            return Err(PayoffError::InvalidInput {
                field: "remaining_term_years".into(),
                reason: "Remaining term must be positive".into(),
            });
        }
        months.to_u32().ok_or_else(|| PayoffError::InvalidInput {
            field: "remaining_term_years".into(),
            reason: "Remaining term is too large".into(),
        })
    }

    pub fn validate(&self, index: usize) -> PayoffResult<()> {
        if self.balance <= Decimal::ZERO {
            return Err(PayoffError::InvalidInput {
                field: format!("loans[{index}].balance"),
                reason: "Balance must be positive".into(),
            });
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(PayoffError::InvalidInput {
                field: format!("loans[{index}].annual_rate_percent"),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.category == LoanCategory::Private {
            self.term_months()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateGroup {
    /// The 48 contiguous states and the District of Columbia.
    #[default]
    Contiguous,
    Alaska,
    Hawaii,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    Jointly,
    Separately,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub adjusted_gross_income: Money,
    pub family_size: u32,
    #[serde(default)]
    pub state_group: StateGroup,
    #[serde(default)]
    pub filing_status: FilingStatus,
}

impl FinancialProfile {
    /// Income-driven formulas only run for a positive income.
    pub fn supports_income_driven(&self) -> bool {
        self.adjusted_gross_income > Decimal::ZERO && self.family_size >= 1
    }
}

/// Answer to "will you borrow again on or after July 1, 2026?"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorrowingIntent {
    Yes,
    No,
    #[default]
    Unanswered,
}

/// Federal loans with a positive balance, in input order.
pub fn federal_loans(loans: &[Loan]) -> impl Iterator<Item = &Loan> {
    loans
        .iter()
        .filter(|l| l.category == LoanCategory::Federal && l.balance > Decimal::ZERO)
}

pub fn total_federal_balance(loans: &[Loan]) -> Money {
    federal_loans(loans).map(|l| l.balance).sum()
}

/// Σ(balance × rate) / Σ(balance) over the federal loans, as an annual decimal rate.
pub fn weighted_average_rate(loans: &[Loan]) -> Rate {
    let total = total_federal_balance(loans);
    if total.is_zero() {
        return Decimal::ZERO;
    }
    let weighted: Decimal = federal_loans(loans).map(|l| l.balance * l.annual_rate()).sum();
    weighted / total
}

pub(crate) fn validate_loans(loans: &[Loan], category: LoanCategory) -> PayoffResult<()> {
    let mut any = false;
    for (i, loan) in loans.iter().enumerate() {
        if loan.category != category {
            return Err(PayoffError::InvalidInput {
                field: format!("loans[{i}].category"),
                reason: format!("Expected a {category:?} loan"),
            });
        }
        loan.validate(i)?;
        any = true;
    }
    if !any {
        return Err(PayoffError::InvalidInput {
            field: "loans".into(),
            reason: "At least one loan is required".into(),
        });
    }
    Ok(())
}
