use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::toml_config::EmailSettings;
use crate::domain::model::Notification;
use crate::domain::ports::{MailTransport, NotificationSender};
use crate::utils::error::{AtmError, Result};
use crate::utils::validation::is_valid_email;

/// Best-effort email channel.
///
/// Only notifications flagged `send_email` go out, and only when the recipient
/// looks like an address and the SMTP settings are complete. Anything else is
/// logged and skipped. Transport failures come back as
/// [`AtmError::Notification`] for the caller to log.
pub struct EmailNotificationSender {
    settings: EmailSettings,
    transport: Box<dyn MailTransport>,
}

impl EmailNotificationSender {
    pub fn new(settings: EmailSettings, transport: Box<dyn MailTransport>) -> Self {
        Self { settings, transport }
    }

    /// Email sender backed by a real SMTP relay.
    pub fn smtp(settings: EmailSettings) -> Self {
        let transport = SmtpMailer::new(&settings);
        Self::new(settings, Box::new(transport))
    }
}

impl NotificationSender for EmailNotificationSender {
    fn name(&self) -> &str {
        "email"
    }

    fn send(&self, notification: &Notification) -> Result<()> {
        if !notification.send_email {
            return Ok(());
        }

        let recipient = match notification.recipient_email.as_deref() {
            Some(r) if is_valid_email(r) => r,
            other => {
                tracing::warn!(recipient = other.unwrap_or(""), "recipient email missing or invalid, email skipped");
                return Ok(());
            }
        };

        if !self.settings.is_complete() {
            tracing::warn!("SMTP settings are incomplete, email skipped");
            return Ok(());
        }

        self.transport
            .deliver(
                &self.settings.sender_email,
                recipient,
                self.settings.subject(),
                &notification.message,
            )
            .inspect_err(|e| tracing::error!(to = %recipient, error = %e, "SMTP delivery failed"))?;

        tracing::info!(to = %recipient, kind = %notification.kind, "email sent");
        Ok(())
    }
}

/// lettre backed transport. A fresh connection is built for every message.
#[derive(Clone)]
pub struct SmtpMailer {
    server: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Self {
        let credentials = if settings.smtp_username.is_empty() {
            None
        } else {
            Some(Credentials::new(
                settings.smtp_username.clone(),
                settings.smtp_password.clone(),
            ))
        };

        Self {
            server: settings.smtp_server.clone(),
            port: settings.smtp_port,
            credentials,
        }
    }

    fn build_transport(&self) -> Result<SmtpTransport> {
        let builder = SmtpTransport::relay(&self.server)
            .map_err(|e| AtmError::Notification {
                message: format!("SMTP relay error: {}", e),
            })?
            .port(self.port);

        let builder = match &self.credentials {
            Some(credentials) => builder.credentials(credentials.clone()),
            None => builder,
        };
        Ok(builder.build())
    }
}

impl MailTransport for SmtpMailer {
    fn deliver(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()> {
        let from: Mailbox = from.parse().map_err(|e| AtmError::Notification {
            message: format!("Invalid from address: {}", e),
        })?;
        let to: Mailbox = to.parse().map_err(|e| AtmError::Notification {
            message: format!("Invalid to address: {}", e),
        })?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AtmError::Notification {
                message: format!("Failed to build email: {}", e),
            })?;

        self.build_transport()?
            .send(&email)
            .map_err(|e| AtmError::Notification {
                message: format!("Failed to send email: {}", e),
            })?;
        Ok(())
    }
}
