use crate::domain::model::Notification;
use crate::utils::error::Result;

/// A delivery channel for notifications (console, email, ...).
pub trait NotificationSender: Send + Sync {
    fn name(&self) -> &str;
    fn send(&self, notification: &Notification) -> Result<()>;
}

/// Outbound mail. Kept separate from the email sender so the policy
/// (when to send) can be tested without a mail server.
pub trait MailTransport: Send + Sync {
    fn deliver(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()>;
}
