//! Sanitize and insert a batch of events, isolating per-record failures.

use std::sync::Arc;
use std::time::Duration;

use execsummary_common::{sanitize, EventRecord, FieldLimits};
use execsummary_store::{EventWriter, InsertError, NewEventRow, StoreError};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Inserts in flight at once. 1 inserts strictly in input order.
    pub concurrency: usize,
    pub insert_timeout: Duration,
    pub limits: FieldLimits,
    pub show_progress: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            insert_timeout: Duration::from_secs(30),
            limits: FieldLimits::default(),
            show_progress: false,
        }
    }
}

/// Outcome counts for one batch. `processed + errors == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadTally {
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
}

pub struct Loader {
    writer: Arc<dyn EventWriter>,
    options: LoaderOptions,
}

impl Loader {
    pub fn new(writer: Arc<dyn EventWriter>, options: LoaderOptions) -> Self {
        Self { writer, options }
    }

    /// Make sure the destination table exists. Failure here ends the run.
    pub async fn prepare(&self) -> Result<(), StoreError> {
        self.writer.ensure_schema().await
    }

    /// Insert every record. A failed record is logged and counted, never fatal.
    pub async fn load(&self, records: Vec<EventRecord>) -> LoadTally {
        let total = records.len();
        info!(total, concurrency = self.options.concurrency, "Loading events");
        let progress = self.progress_bar(total);

        let outcomes: Vec<(EventRecord, Result<(), InsertError>)> = stream::iter(records)
            .map(|record| {
                let progress = progress.clone();
                async move {
                    let result = self.load_one(&record).await;
                    progress.inc(1);
                    (record, result)
                }
            })
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        progress.finish_and_clear();

        let mut tally = LoadTally {
            total,
            ..Default::default()
        };
        for (record, result) in outcomes {
            match result {
                Ok(()) => tally.processed += 1,
                Err(e) => {
                    tally.errors += 1;
                    warn!(event_id = %record.log_id(), error = %e, "Failed to process event");
                }
            }
        }

        info!(
            total = tally.total,
            processed = tally.processed,
            errors = tally.errors,
            "Load finished"
        );
        tally
    }

    async fn load_one(&self, record: &EventRecord) -> Result<(), InsertError> {
        let clean = sanitize(record, &self.options.limits);
        let row = NewEventRow::from_record(&clean)?;

        match tokio::time::timeout(self.options.insert_timeout, self.writer.insert(&row)).await {
            Ok(result) => result,
            Err(_) => Err(InsertError::Timeout(self.options.insert_timeout)),
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} events ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    }
}
