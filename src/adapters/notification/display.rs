use crate::domain::model::Notification;
use crate::domain::ports::NotificationSender;
use crate::utils::error::Result;

/// Routes every notification to the log sink.
#[derive(Debug, Clone, Default)]
pub struct DisplayNotificationSender;

impl DisplayNotificationSender {
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSender for DisplayNotificationSender {
    fn name(&self) -> &str {
        "display"
    }

    fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            kind = %notification.kind,
            recipient = notification.recipient_email.as_deref().unwrap_or("-"),
            "{}",
            notification.message
        );
        Ok(())
    }
}
