use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use execsummary_common::{Config, DateRange};
use execsummary_ingest::{build_notifier, run_ingest};

#[derive(Parser)]
#[command(name = "ingest", about = "Load leasing events into the reporting database")]
struct Cli {
    /// First day of the report (YYYY-MM-DD). Defaults to the start of last month.
    #[arg(long, env = "START_DATE", requires = "end_date")]
    start_date: Option<NaiveDate>,

    /// Last day of the report (YYYY-MM-DD). Defaults to the end of last month.
    #[arg(long, env = "END_DATE", requires = "start_date")]
    end_date: Option<NaiveDate>,

    /// Load a saved report body instead of calling the reporting API
    #[arg(long)]
    payload: Option<PathBuf>,
}

impl Cli {
    fn range(&self) -> Result<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)?),
            _ => Ok(DateRange::previous_month(Utc::now().date_naive())),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    match run().await {
        Ok(()) => {
            info!("Process completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Process failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let range = cli.range()?;

    let config = Config::ingest_from_env().context("Invalid configuration")?;
    let notifier = build_notifier(&config);

    let report = run_ingest(
        &config,
        &range,
        cli.payload,
        notifier,
        std::io::stderr().is_terminal(),
    )
    .await
    .context("Ingestion run failed")?;

    info!(
        processed = report.tally.processed,
        errors = report.tally.errors,
        "Batch finished"
    );
    Ok(())
}
