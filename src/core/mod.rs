pub mod atm;
pub mod bank;
pub mod manager;

pub use crate::domain::model::{Account, AtmEvent, EventKind, Notification, Outcome};
pub use crate::domain::ports::{MailTransport, NotificationSender};
pub use crate::utils::error::Result;
