use crate::domain::model::Notification;
use crate::domain::ports::NotificationSender;
use crate::utils::error::Result;

/// Fans a notification out to every sender in order. A sender that fails is
/// logged and skipped; the rest still run.
#[derive(Default)]
pub struct MultiNotificationSender {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl MultiNotificationSender {
    pub fn new(senders: Vec<Box<dyn NotificationSender>>) -> Self {
        Self { senders }
    }

    pub fn with(mut self, sender: impl NotificationSender + 'static) -> Self {
        self.senders.push(Box::new(sender));
        self
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl NotificationSender for MultiNotificationSender {
    fn name(&self) -> &str {
        "multi"
    }

    fn send(&self, notification: &Notification) -> Result<()> {
        for sender in &self.senders {
            if let Err(e) = sender.send(notification) {
                tracing::warn!(sender = sender.name(), error = %e, "sender failed, continuing with the rest");
            }
        }
        Ok(())
    }
}
