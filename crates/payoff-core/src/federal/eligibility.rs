//! Which federal plans a borrower may choose.
//!
//! Eligibility is decided by the origination eras of the federal loans, the
//! borrower's intent to borrow again after the July 2026 cutoff, and the
//! evaluation date (for plans with a sunset).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loans::{federal_loans, BorrowingIntent, Loan, OriginationEra};

use super::plans::RepaymentPlan;

/// Regime the borrower falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorrowerRegime {
    /// No federal balance to repay.
    NoFederalLoans,
    /// Every federal loan was originated after the cutoff.
    NewBorrower,
    /// Holds pre-cutoff loans but intends to borrow again, which forfeits
    /// the legacy plans.
    Contaminated,
    Grandfathered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub regime: BorrowerRegime,
    /// Eligible plans in catalog order.
    pub plans: Vec<RepaymentPlan>,
    pub contamination_warning: bool,
}

pub fn resolve_eligibility(
    loans: &[Loan],
    intent: BorrowingIntent,
    as_of: NaiveDate,
) -> EligibilityOutcome {
    let eras: Vec<OriginationEra> = federal_loans(loans).map(|l| l.origination_era).collect();
    let regime = classify(&eras, intent);
    let all_post_2014 = !eras.is_empty() && eras.iter().all(|e| e.is_post_2014());

    let plans: Vec<RepaymentPlan> = RepaymentPlan::ALL
        .into_iter()
        .filter(|plan| admits(*plan, regime, all_post_2014))
        .filter(|plan| {
            let closed = plan.is_sunset(as_of);
            if closed {
                log::debug!("{} excluded: sunset on or before {as_of}", plan.display_name());
            }
            !closed
        })
        .collect();

    log::debug!(
        "eligibility: {} federal loans, regime {regime:?}, {} plans",
        eras.len(),
        plans.len()
    );

    EligibilityOutcome {
        regime,
        plans,
        contamination_warning: regime == BorrowerRegime::Contaminated,
    }
}

fn classify(eras: &[OriginationEra], intent: BorrowingIntent) -> BorrowerRegime {
    if eras.is_empty() {
        return BorrowerRegime::NoFederalLoans;
    }
    if eras.iter().all(|e| *e == OriginationEra::Post2026) {
        return BorrowerRegime::NewBorrower;
    }
    // Anything short of all-post-2026 holds a legacy loan; unset eras count as legacy.
    let legacy = eras
        .iter()
        .any(|e| e.is_pre_cutoff() || *e == OriginationEra::Unset);
    if legacy && intent == BorrowingIntent::Yes {
        return BorrowerRegime::Contaminated;
    }
    BorrowerRegime::Grandfathered
}

/// Rule table: does `regime` admit `plan`?
fn admits(plan: RepaymentPlan, regime: BorrowerRegime, all_post_2014: bool) -> bool {
    match regime {
        BorrowerRegime::NoFederalLoans => false,
        BorrowerRegime::NewBorrower | BorrowerRegime::Contaminated => {
            matches!(plan, RepaymentPlan::Rap | RepaymentPlan::StandardizedTiered)
        }
        BorrowerRegime::Grandfathered => match plan {
            RepaymentPlan::NewIbr => all_post_2014,
            RepaymentPlan::OldIbr => !all_post_2014,
            _ => true,
        },
    }
}
