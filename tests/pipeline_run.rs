use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use filings_watch::pipeline::{
    CheckpointStore, LateFilingRecord, ObligationKind, Pipeline, PipelineError, RunMode,
    POPULATION_CHECKPOINT,
};
use filings_watch::registry::{
    AccountsSchedule, CompanyProfile, CompanySummary, FilingDeadline, RegistryError,
    RegistryGateway,
};

#[derive(Debug)]
struct FakeRegistry {
    companies: Vec<CompanySummary>,
    profiles: HashMap<String, CompanyProfile>,
    calls: Mutex<Vec<String>>,
}

impl FakeRegistry {
    fn new(companies: Vec<CompanySummary>, profiles: HashMap<String, CompanyProfile>) -> Self {
        Self {
            companies,
            profiles,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn empty() -> Self {
        Self::new(Vec::new(), HashMap::new())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call mutex").clone()
    }
}

impl RegistryGateway for FakeRegistry {
    fn active_companies(&self) -> Result<Vec<CompanySummary>, RegistryError> {
        self.calls.lock().expect("call mutex").push("search".to_string());
        Ok(self.companies.clone())
    }

    fn company_profile(&self, company_number: &str) -> Result<CompanyProfile, RegistryError> {
        self.calls
            .lock()
            .expect("call mutex")
            .push(format!("profile:{company_number}"));
        self.profiles
            .get(company_number)
            .cloned()
            .ok_or_else(|| RegistryError::Http {
                status: 404,
                body: format!("no such company {company_number}"),
            })
    }
}

fn company(number: &str, name: &str) -> CompanySummary {
    CompanySummary {
        company_number: number.to_string(),
        company_name: name.to_string(),
    }
}

fn overdue_accounts(due: NaiveDate) -> CompanyProfile {
    CompanyProfile {
        accounts: AccountsSchedule {
            next_accounts: Some(FilingDeadline { due, overdue: true }),
        },
        confirmation_statement: None,
    }
}

fn no_obligations() -> CompanyProfile {
    CompanyProfile {
        accounts: AccountsSchedule {
            next_accounts: None,
        },
        confirmation_statement: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn both_kinds() -> Vec<ObligationKind> {
    ObligationKind::ordered().to_vec()
}

#[test]
fn fresh_run_flags_overdue_accounts_and_skips_inactive_companies() {
    let run_date = date(2024, 1, 10);
    let registry = FakeRegistry::new(
        vec![company("00000001", "ALPHA PLC"), company("00000002", "BETA PLC")],
        HashMap::from([
            ("00000001".to_string(), overdue_accounts(date(2024, 1, 1))),
            ("00000002".to_string(), no_obligations()),
        ]),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let pipeline = Pipeline::new(&registry, CheckpointStore::new(dir.path()), both_kinds());

    let output = pipeline
        .run(RunMode::default(), run_date)
        .expect("fresh run succeeds");

    assert_eq!(output.population_size, 2);

    let accounts = &output.findings[0];
    assert_eq!(accounts.kind, ObligationKind::AnnualAccounts);
    assert_eq!(accounts.records.len(), 1);
    assert_eq!(accounts.records[0].name, "ALPHA PLC");
    assert_eq!(accounts.records[0].days_late, 9);
    assert!(accounts.records[0].link.ends_with("/company/00000001"));

    let confirmations = &output.findings[1];
    assert_eq!(confirmations.kind, ObligationKind::ConfirmationStatement);
    assert!(confirmations.records.is_empty());

    assert_eq!(
        registry.calls(),
        vec!["search", "profile:00000001", "profile:00000002"]
    );
}

#[test]
fn fresh_run_writes_all_checkpoints() {
    let registry = FakeRegistry::new(
        vec![company("00000001", "ALPHA PLC")],
        HashMap::from([("00000001".to_string(), overdue_accounts(date(2024, 1, 1)))]),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CheckpointStore::new(dir.path());
    let pipeline = Pipeline::new(&registry, store.clone(), both_kinds());

    pipeline
        .run(RunMode::default(), date(2024, 1, 10))
        .expect("fresh run succeeds");

    let population: Vec<CompanySummary> = store.load(POPULATION_CHECKPOINT);
    assert_eq!(population, vec![company("00000001", "ALPHA PLC")]);

    let accounts: Vec<LateFilingRecord> =
        store.load(ObligationKind::AnnualAccounts.checkpoint_file());
    assert_eq!(accounts.len(), 1);

    let confirmations: Vec<LateFilingRecord> =
        store.load(ObligationKind::ConfirmationStatement.checkpoint_file());
    assert!(confirmations.is_empty());
}

#[test]
fn fully_cached_run_never_touches_the_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CheckpointStore::new(dir.path());
    store
        .save(
            POPULATION_CHECKPOINT,
            &[company("00000001", "ALPHA PLC"), company("00000002", "BETA PLC")],
        )
        .expect("seed population");
    let seeded = vec![LateFilingRecord {
        name: "ALPHA PLC".to_string(),
        link: "https://example.test/company/00000001".to_string(),
        due_date: date(2024, 1, 1),
        days_late: 9,
    }];
    store
        .save(ObligationKind::AnnualAccounts.checkpoint_file(), &seeded)
        .expect("seed accounts");
    store
        .save(
            ObligationKind::ConfirmationStatement.checkpoint_file(),
            &Vec::<LateFilingRecord>::new(),
        )
        .expect("seed confirmations");

    let registry = FakeRegistry::empty();
    let pipeline = Pipeline::new(&registry, store, both_kinds());
    let output = pipeline
        .run(
            RunMode {
                refresh_population: false,
                refresh_filings: false,
            },
            date(2024, 3, 1),
        )
        .expect("cached run succeeds");

    assert!(registry.calls().is_empty());
    assert_eq!(output.population_size, 2);
    assert_eq!(output.findings[0].records, seeded);
    // Cached days_late values are served as written, not re-derived for the
    // new run date.
    assert_eq!(output.findings[0].records[0].days_late, 9);
}

#[test]
fn cached_population_with_fresh_filings_skips_enumeration_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CheckpointStore::new(dir.path());
    store
        .save(POPULATION_CHECKPOINT, &[company("00000001", "ALPHA PLC")])
        .expect("seed population");

    let registry = FakeRegistry::new(
        Vec::new(),
        HashMap::from([("00000001".to_string(), overdue_accounts(date(2024, 1, 1)))]),
    );
    let pipeline = Pipeline::new(&registry, store, both_kinds());
    let output = pipeline
        .run(
            RunMode {
                refresh_population: false,
                refresh_filings: true,
            },
            date(2024, 1, 10),
        )
        .expect("run succeeds");

    assert_eq!(registry.calls(), vec!["profile:00000001"]);
    assert_eq!(output.findings[0].records.len(), 1);
}

#[test]
fn missing_population_checkpoint_yields_an_empty_cached_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = FakeRegistry::empty();
    let pipeline = Pipeline::new(&registry, CheckpointStore::new(dir.path()), both_kinds());

    let output = pipeline
        .run(
            RunMode {
                refresh_population: false,
                refresh_filings: true,
            },
            date(2024, 1, 10),
        )
        .expect("empty cached run succeeds");

    assert_eq!(output.population_size, 0);
    assert!(registry.calls().is_empty());
    assert!(output.findings.iter().all(|entry| entry.records.is_empty()));
}

#[test]
fn a_fatal_profile_error_aborts_the_whole_run() {
    let registry = FakeRegistry::new(
        vec![company("00000001", "ALPHA PLC"), company("00000002", "BETA PLC")],
        HashMap::from([("00000002".to_string(), no_obligations())]),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CheckpointStore::new(dir.path());
    let pipeline = Pipeline::new(&registry, store.clone(), both_kinds());

    let error = pipeline
        .run(RunMode::default(), date(2024, 1, 10))
        .expect_err("first company has no profile");

    assert!(matches!(
        error,
        PipelineError::Registry(RegistryError::Http { status: 404, .. })
    ));
    // Processing stopped at the first failure; the second company was never
    // fetched and no filing checkpoints were written.
    assert_eq!(registry.calls(), vec!["search", "profile:00000001"]);
    assert!(!store
        .path(ObligationKind::AnnualAccounts.checkpoint_file())
        .exists());
    // The population stage had already completed, so its checkpoint survives
    // for the rerun.
    assert!(store.path(POPULATION_CHECKPOINT).exists());
}

#[test]
fn both_obligations_can_be_late_for_the_same_company() {
    let profile = CompanyProfile {
        accounts: AccountsSchedule {
            next_accounts: Some(FilingDeadline {
                due: date(2024, 1, 1),
                overdue: true,
            }),
        },
        confirmation_statement: Some(FilingDeadline {
            due: date(2024, 1, 5),
            overdue: true,
        }),
    };
    let registry = FakeRegistry::new(
        vec![company("00000001", "ALPHA PLC")],
        HashMap::from([("00000001".to_string(), profile)]),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let pipeline = Pipeline::new(&registry, CheckpointStore::new(dir.path()), both_kinds());

    let output = pipeline
        .run(RunMode::default(), date(2024, 1, 10))
        .expect("run succeeds");

    assert_eq!(output.findings[0].records.len(), 1);
    assert_eq!(output.findings[1].records.len(), 1);
    assert_eq!(output.findings[0].records[0].days_late, 9);
    assert_eq!(output.findings[1].records[0].days_late, 5);
}

#[test]
fn a_pipeline_tracking_only_accounts_ignores_confirmations() {
    let profile = CompanyProfile {
        accounts: AccountsSchedule {
            next_accounts: None,
        },
        confirmation_statement: Some(FilingDeadline {
            due: date(2024, 1, 5),
            overdue: true,
        }),
    };
    let registry = FakeRegistry::new(
        vec![company("00000001", "ALPHA PLC")],
        HashMap::from([("00000001".to_string(), profile)]),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let pipeline = Pipeline::new(
        &registry,
        CheckpointStore::new(dir.path()),
        vec![ObligationKind::AnnualAccounts],
    );

    let output = pipeline
        .run(RunMode::default(), date(2024, 1, 10))
        .expect("run succeeds");

    assert_eq!(output.findings.len(), 1);
    assert_eq!(output.findings[0].kind, ObligationKind::AnnualAccounts);
    assert!(output.findings[0].records.is_empty());
}
