//! Run summaries and their delivery.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use execsummary_common::DateRange;
use tracing::{error, info, warn};

use crate::loader::LoadTally;
use crate::notify::Notifier;

pub const SUCCESS_SUBJECT: &str = "Elise AI Events Processing Report";
pub const FAILURE_SUBJECT: &str = "Elise AI Events Processing ERROR";

/// Counters and timing for one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub range: DateRange,
    pub tally: LoadTally,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0) as f64 / 1000.0
    }

    pub fn summary_text(&self) -> String {
        format!(
            "Data Processing Report\n\
             ---------------------\n\
             Date Range: {}\n\
             Total Events: {}\n\
             Events Processed: {}\n\
             Errors: {}\n\
             Duration: {:.1} seconds\n\
             \n\
             Job completed at: {}\n",
            self.range,
            self.tally.total,
            self.tally.processed,
            self.tally.errors,
            self.duration_secs(),
            self.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}

pub fn failure_text(message: &str) -> String {
    format!("Error processing events: {message}")
}

/// Sends run outcomes. Delivery failures are logged and swallowed.
#[derive(Clone)]
pub struct RunReporter {
    notifier: Arc<dyn Notifier>,
}

impl RunReporter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn report_success(&self, report: &RunReport) {
        info!(
            range = %report.range,
            total = report.tally.total,
            processed = report.tally.processed,
            errors = report.tally.errors,
            duration_secs = report.duration_secs(),
            "Run complete"
        );
        self.dispatch(SUCCESS_SUBJECT, &report.summary_text()).await;
    }

    pub async fn report_failure(&self, message: &str) {
        error!(error = %message, "Run failed");
        self.dispatch(FAILURE_SUBJECT, &failure_text(message)).await;
    }

    async fn dispatch(&self, subject: &str, body: &str) {
        if let Err(e) = self.notifier.send(subject, body).await {
            warn!(error = %e, subject, "Failed to send run notification");
        }
    }
}
