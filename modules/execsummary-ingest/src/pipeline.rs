//! One ingestion run: schema, fetch, parse, load, report.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use execsummary_common::{Config, DateRange, FieldLimits};
use execsummary_store::{PgEventStore, PoolSettings, StoreError};
use leasing_client::{
    parse_payload, FetchError, ParseError, RawPayload, ReportingClient, ReportingClientOptions,
};
use thiserror::Error;
use tracing::info;

use crate::loader::{Loader, LoaderOptions};
use crate::notify::Notifier;
use crate::report::{RunReport, RunReporter};

/// Failures that abort a run before or instead of the insert loop.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Schema setup failed: {0}")]
    Schema(String),

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Could not read payload file {path}: {message}")]
    Payload { path: PathBuf, message: String },
}

impl From<StoreError> for RunError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Schema(m) => RunError::Schema(m),
            StoreError::Storage(m) => RunError::Storage(m),
        }
    }
}

/// Anything that can produce the raw events report for a date range.
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn fetch(&self, range: &DateRange) -> Result<RawPayload, FetchError>;
}

#[async_trait]
impl EventFeed for ReportingClient {
    async fn fetch(&self, range: &DateRange) -> Result<RawPayload, FetchError> {
        self.fetch_events(range).await
    }
}

/// Where a run's events come from.
#[derive(Clone)]
pub enum PayloadSource {
    Feed(Arc<dyn EventFeed>),
    /// A saved report body, read as text and parsed like a fetched one.
    File(PathBuf),
}

impl PayloadSource {
    async fn load(&self, range: &DateRange) -> Result<RawPayload, RunError> {
        match self {
            PayloadSource::Feed(feed) => Ok(feed.fetch(range).await?),
            PayloadSource::File(path) => {
                info!(path = %path.display(), "Reading saved payload");
                tokio::fs::read_to_string(path)
                    .await
                    .map(RawPayload::Text)
                    .map_err(|e| RunError::Payload {
                        path: path.clone(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

pub struct Pipeline {
    source: PayloadSource,
    loader: Loader,
    reporter: RunReporter,
}

impl Pipeline {
    pub fn new(source: PayloadSource, loader: Loader, reporter: RunReporter) -> Self {
        Self {
            source,
            loader,
            reporter,
        }
    }

    /// Run once. Process-level failures are reported before being returned.
    pub async fn run(&self, range: &DateRange) -> Result<RunReport, RunError> {
        match self.execute(range).await {
            Ok(report) => {
                self.reporter.report_success(&report).await;
                Ok(report)
            }
            Err(e) => {
                self.reporter.report_failure(&e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn execute(&self, range: &DateRange) -> Result<RunReport, RunError> {
        let started_at = Utc::now();
        info!(range = %range, "Starting ingestion run");

        self.loader.prepare().await?;

        let payload = self.source.load(range).await?;
        let records = parse_payload(payload)?;
        info!(count = records.len(), "Found events to process");

        let tally = self.loader.load(records).await;

        Ok(RunReport {
            range: *range,
            tally,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Wire a run against Postgres and the reporting API (or a saved payload)
/// from configuration. The pool is closed whatever the outcome.
pub async fn run_ingest(
    config: &Config,
    range: &DateRange,
    payload_file: Option<PathBuf>,
    notifier: Arc<dyn Notifier>,
    show_progress: bool,
) -> Result<RunReport, RunError> {
    let reporter = RunReporter::new(notifier);

    let source = match payload_file {
        Some(path) => PayloadSource::File(path),
        None => {
            let client = ReportingClient::new(ReportingClientOptions {
                endpoint: config.reporting_api_url.clone(),
                security_key: config.reporting_api_key.clone(),
                timeout: config.fetch_timeout,
            });
            match client {
                Ok(client) => PayloadSource::Feed(Arc::new(client)),
                Err(e) => {
                    let err = RunError::from(e);
                    reporter.report_failure(&err.to_string()).await;
                    return Err(err);
                }
            }
        }
    };

    let store = match PgEventStore::connect(&config.database_url, pool_settings(config)).await {
        Ok(store) => store,
        Err(e) => {
            let err = RunError::from(e);
            reporter.report_failure(&err.to_string()).await;
            return Err(err);
        }
    };

    let loader = Loader::new(
        Arc::new(store.clone()),
        LoaderOptions {
            concurrency: config.insert_concurrency,
            insert_timeout: config.insert_timeout,
            limits: FieldLimits::default(),
            show_progress,
        },
    );

    let result = Pipeline::new(source, loader, reporter).run(range).await;
    store.close().await;
    result
}

/// One connection per in-flight insert, saturating rather than wrapping.
fn pool_settings(config: &Config) -> PoolSettings {
    PoolSettings {
        max_connections: u32::try_from(config.insert_concurrency).unwrap_or(u32::MAX),
        acquire_timeout: config.db_acquire_timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(concurrency: &str) -> Config {
        let vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://x"),
            ("REPORTING_API_KEY", "secret"),
            ("INSERT_CONCURRENCY", concurrency),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Config::from_map(&vars).unwrap()
    }

    #[test]
    fn pool_is_sized_to_insert_concurrency() {
        assert_eq!(pool_settings(&config("6")).max_connections, 6);
    }

    #[test]
    fn oversized_concurrency_saturates_pool_size() {
        let huge = (u64::from(u32::MAX) + 5).to_string();
        let settings = pool_settings(&config(&huge));
        assert_eq!(settings.max_connections, u32::MAX);
    }
}
