use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::registry::{CompanyProfile, CompanySummary, FilingDeadline};

/// Public company page used as the reference link in reports.
pub const PUBLIC_COMPANY_URL: &str =
    "https://find-and-update.company-information.service.gov.uk/company";

/// Statutory obligations the pipeline can track. The fetch/classify loop is
/// parameterized by a list of kinds, so both obligations ride on a single
/// pass over the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    AnnualAccounts,
    ConfirmationStatement,
}

impl ObligationKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::AnnualAccounts, Self::ConfirmationStatement]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AnnualAccounts => "annual accounts",
            Self::ConfirmationStatement => "confirmation statement",
        }
    }

    pub const fn checkpoint_file(self) -> &'static str {
        match self {
            Self::AnnualAccounts => "late_accounts.json",
            Self::ConfirmationStatement => "late_confirmations.json",
        }
    }

    pub const fn report_file(self) -> &'static str {
        match self {
            Self::AnnualAccounts => "late_accounts.html",
            Self::ConfirmationStatement => "late_confirmations.html",
        }
    }

    fn deadline(self, profile: &CompanyProfile) -> Option<&FilingDeadline> {
        match self {
            Self::AnnualAccounts => profile.accounts.next_accounts.as_ref(),
            Self::ConfirmationStatement => profile.confirmation_statement.as_ref(),
        }
    }
}

/// A company that has missed a filing deadline, as of the run date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFilingRecord {
    pub name: String,
    pub link: String,
    pub due_date: NaiveDate,
    pub days_late: i64,
}

/// Signed day difference between the run date and the due date, captured at
/// classification time. The value is never re-derived later, so reruns on a
/// different day produce different numbers for the same due date.
pub fn days_late(due_date: NaiveDate, run_date: NaiveDate) -> i64 {
    run_date.signed_duration_since(due_date).num_days()
}

/// Derives a late-filing record for one obligation kind. An absent block is
/// an inactive obligation, not an error; a met deadline produces nothing.
/// Negative day counts are reported as-is: the registry's `overdue` flag is
/// the source of truth.
pub fn classify(
    kind: ObligationKind,
    company: &CompanySummary,
    profile: &CompanyProfile,
    run_date: NaiveDate,
) -> Option<LateFilingRecord> {
    let Some(deadline) = kind.deadline(profile) else {
        info!(
            company = %company.company_name,
            obligation = kind.label(),
            "inactive company, obligation not tracked"
        );
        return None;
    };

    if !deadline.overdue {
        return None;
    }

    Some(LateFilingRecord {
        name: company.company_name.clone(),
        link: format!("{PUBLIC_COMPANY_URL}/{}", company.company_number),
        due_date: deadline.due,
        days_late: days_late(deadline.due, run_date),
    })
}
