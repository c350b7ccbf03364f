mod checkpoint;
mod crossref;
mod lateness;

pub use checkpoint::{CheckpointError, CheckpointStore};
pub use crossref::IssuerIndex;
pub use lateness::{classify, days_late, LateFilingRecord, ObligationKind, PUBLIC_COMPANY_URL};

use chrono::NaiveDate;
use tracing::info;

use crate::registry::{CompanySummary, RegistryError, RegistryGateway};

/// Snapshot of the enumerated company population.
pub const POPULATION_CHECKPOINT: &str = "active_plcs.json";

/// Two independent switches decide whether each stage re-fetches or reuses
/// the last checkpoint. Defaults to a fully fresh run.
#[derive(Debug, Clone, Copy)]
pub struct RunMode {
    pub refresh_population: bool,
    pub refresh_filings: bool,
}

impl Default for RunMode {
    fn default() -> Self {
        Self {
            refresh_population: true,
            refresh_filings: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// Late-filing records for one obligation kind, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObligationFindings {
    pub kind: ObligationKind,
    pub records: Vec<LateFilingRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub population_size: usize,
    pub findings: Vec<ObligationFindings>,
}

/// Sequences enumeration, per-company fetch/classify, and checkpointing.
/// Fully sequential: one registry call in flight at a time, output order
/// equal to enumeration order. Any registry error aborts the remaining
/// companies; a rerun resumes from the last checkpoint.
#[derive(Debug)]
pub struct Pipeline<'a> {
    gateway: &'a dyn RegistryGateway,
    store: CheckpointStore,
    obligations: Vec<ObligationKind>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        gateway: &'a dyn RegistryGateway,
        store: CheckpointStore,
        obligations: Vec<ObligationKind>,
    ) -> Self {
        Self {
            gateway,
            store,
            obligations,
        }
    }

    pub fn run(&self, mode: RunMode, run_date: NaiveDate) -> Result<PipelineOutput, PipelineError> {
        let population = if mode.refresh_population {
            info!("reading the active PLC register from the registry");
            let companies = self.gateway.active_companies()?;
            self.store.save(POPULATION_CHECKPOINT, &companies)?;
            companies
        } else {
            info!("loading the active PLC register from the last checkpoint");
            self.store.load(POPULATION_CHECKPOINT)
        };

        let findings = if mode.refresh_filings {
            let findings = self.collect_late_filings(&population, run_date)?;
            for entry in &findings {
                self.store.save(entry.kind.checkpoint_file(), &entry.records)?;
            }
            findings
        } else {
            info!("loading late-filing snapshots from the last checkpoint");
            self.obligations
                .iter()
                .map(|&kind| ObligationFindings {
                    kind,
                    records: self.store.load(kind.checkpoint_file()),
                })
                .collect()
        };

        Ok(PipelineOutput {
            population_size: population.len(),
            findings,
        })
    }

    fn collect_late_filings(
        &self,
        population: &[CompanySummary],
        run_date: NaiveDate,
    ) -> Result<Vec<ObligationFindings>, PipelineError> {
        let mut findings: Vec<ObligationFindings> = self
            .obligations
            .iter()
            .map(|&kind| ObligationFindings {
                kind,
                records: Vec::new(),
            })
            .collect();

        info!(
            total = population.len(),
            "checking filing deadlines for every active PLC"
        );
        for (index, company) in population.iter().enumerate() {
            info!(
                "{}/{}: {} - {}",
                index + 1,
                population.len(),
                company.company_name,
                company.company_number
            );
            let profile = self.gateway.company_profile(&company.company_number)?;

            for entry in &mut findings {
                if let Some(record) = classify(entry.kind, company, &profile, run_date) {
                    info!(
                        obligation = entry.kind.label(),
                        name = %record.name,
                        days_late = record.days_late,
                        "late filing"
                    );
                    entry.records.push(record);
                }
            }
        }

        Ok(findings)
    }
}
