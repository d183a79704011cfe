use async_trait::async_trait;
use tracing::info;

use super::backend::{NotificationError, Notifier};

/// Writes reports to the log. Used when no SMTP relay is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        info!(subject, "Run report (email not configured)\n{body}");
        Ok(())
    }
}
