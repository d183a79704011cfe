pub mod backend;
pub mod log;
pub mod smtp;

use std::sync::Arc;

use execsummary_common::Config;
use tracing::{info, warn};

pub use self::backend::{NotificationError, Notifier};
pub use self::log::LogNotifier;
pub use self::smtp::SmtpNotifier;

/// SMTP when a relay and a sender are configured, otherwise the log.
pub fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    let (Some(smtp), Some(from)) = (&config.smtp, &config.notify_from) else {
        info!("No SMTP relay configured, reports go to the log");
        return Arc::new(LogNotifier);
    };

    match SmtpNotifier::new(smtp, from, &config.notify_recipients) {
        Ok(notifier) => {
            info!(host = %smtp.host, "Email notifications enabled");
            Arc::new(notifier)
        }
        Err(e) => {
            warn!(error = %e, "Invalid email settings, reports go to the log");
            Arc::new(LogNotifier)
        }
    }
}
