use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::backend::{NotificationError, Notifier};
use execsummary_common::SmtpConfig;

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain-text email over an authenticated SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl SmtpNotifier {
    pub fn new(
        smtp: &SmtpConfig,
        from: &str,
        recipients: &[String],
    ) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .timeout(Some(SEND_TIMEOUT))
            .build();

        let recipients = recipients
            .iter()
            .map(|r| parse_mailbox(r))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            transport,
            from: parse_mailbox(from)?,
            recipients,
        })
    }

    fn message(&self, subject: &str, body: &str) -> Result<Message, NotificationError> {
        if self.recipients.is_empty() {
            return Err(NotificationError::Build("no recipients configured".to_string()));
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for to in &self.recipients {
            builder = builder.to(to.clone());
        }

        builder
            .body(body.to_string())
            .map_err(|e| NotificationError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        let message = self.message(subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        info!(subject, recipients = self.recipients.len(), "Report email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::Address {
            address: address.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            username: "reports@example.com".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let result = SmtpNotifier::new(
            &smtp(),
            "reports@example.com",
            &["not an address".to_string()],
        );
        assert!(matches!(result, Err(NotificationError::Address { .. })));
    }

    #[tokio::test]
    async fn builds_plain_text_message_for_every_recipient() {
        let notifier = SmtpNotifier::new(
            &smtp(),
            "reports@example.com",
            &["a@example.com".to_string(), "b@example.com".to_string()],
        )
        .unwrap();

        let message = notifier.message("Subject", "Body text").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Subject"));
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("text/plain"));
    }

    #[tokio::test]
    async fn no_recipients_fails_to_build() {
        let notifier = SmtpNotifier::new(&smtp(), "reports@example.com", &[]).unwrap();
        assert!(matches!(
            notifier.message("s", "b"),
            Err(NotificationError::Build(_))
        ));
    }
}
