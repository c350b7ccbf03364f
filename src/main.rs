use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use filings_watch::config::AppConfig;
use filings_watch::delivery::{DeliveryGateway, ScpDelivery};
use filings_watch::error::AppError;
use filings_watch::issuers::{self, CsvIssuerSource};
use filings_watch::pipeline::{CheckpointStore, IssuerIndex, ObligationKind, Pipeline, RunMode};
use filings_watch::registry::HttpRegistryClient;
use filings_watch::report::{render_report, ReportContext};
use filings_watch::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "filings-watch",
    about = "Flag active UK PLCs with overdue statutory filings",
    version
)]
struct Cli {
    /// Reuse the last population checkpoint instead of querying the registry
    #[arg(long)]
    cached_population: bool,
    /// Reuse the last late-filing checkpoints instead of fetching every profile
    #[arg(long)]
    cached_filings: bool,
    /// Classify lateness as of this date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    run_date: Option<NaiveDate>,
    /// Override the directory holding checkpoints and reports
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Render reports but skip the remote upload
    #[arg(long)]
    skip_upload: bool,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    telemetry::init(&config.telemetry)?;

    let run_date = cli.run_date.unwrap_or_else(|| Local::now().date_naive());
    let mode = RunMode {
        refresh_population: !cli.cached_population,
        refresh_filings: !cli.cached_filings,
    };

    let specs = issuers::load_source_specs(&config.issuers.descriptor_path)?;
    let lists = issuers::collect_issuer_lists(&CsvIssuerSource, &specs)?;
    let issuer_index = IssuerIndex::from_lists(&lists);

    let client = HttpRegistryClient::from_config(&config.registry)?;
    let store = CheckpointStore::new(&config.storage.data_dir);
    let pipeline = Pipeline::new(&client, store, ObligationKind::ordered().to_vec());

    info!(
        run_date = %run_date,
        refresh_population = mode.refresh_population,
        refresh_filings = mode.refresh_filings,
        "starting filings run"
    );
    let output = pipeline.run(mode, run_date)?;

    for findings in &output.findings {
        info!(
            obligation = findings.kind.label(),
            late = findings.records.len(),
            total = output.population_size,
            "late filings found"
        );

        let title = format!("UK PLCs with late {}", findings.kind.label());
        let html = render_report(&ReportContext {
            title: &title,
            records: &findings.records,
            issuers: &issuer_index,
            population_size: output.population_size,
            generated_at: Local::now().naive_local(),
        });

        let path = config.storage.data_dir.join(findings.kind.report_file());
        fs::write(&path, html)?;
        info!(path = %path.display(), "report written");

        if !cli.skip_upload {
            if let Some(destination) = &config.delivery.upload_destination {
                ScpDelivery::new(destination.clone()).deliver(&path)?;
            }
        }
    }

    info!("all done");
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
