pub mod loader;
pub mod notify;
pub mod pipeline;
pub mod report;

pub use loader::{LoadTally, Loader, LoaderOptions};
pub use notify::{build_notifier, LogNotifier, NotificationError, Notifier, SmtpNotifier};
pub use pipeline::{run_ingest, EventFeed, PayloadSource, Pipeline, RunError};
pub use report::{RunReport, RunReporter, FAILURE_SUBJECT, SUCCESS_SUBJECT};
