use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the advanced-search result, persisted in the population
/// checkpoint. The registry returns many more fields per company; only the
/// identifying pair is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company_number: String,
    pub company_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompanySearchPage {
    #[serde(default)]
    pub(crate) items: Vec<CompanySummary>,
}

/// Per-company filing profile. Consumed immediately by the lateness
/// classifier, never persisted. A missing `accounts` object means the
/// response is structurally wrong; a missing `next_accounts` or
/// `confirmation_statement` block only means that obligation is not tracked
/// for the company.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyProfile {
    pub accounts: AccountsSchedule,
    pub confirmation_statement: Option<FilingDeadline>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsSchedule {
    pub next_accounts: Option<FilingDeadline>,
}

/// Due-date block shared by both obligation kinds. The registry calls the
/// date `due_on` under accounts and `next_due` on the confirmation
/// statement.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingDeadline {
    #[serde(alias = "due_on", alias = "next_due")]
    pub due: NaiveDate,
    pub overdue: bool,
}
