pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::notification::{DisplayNotificationSender, EmailNotificationSender, MultiNotificationSender};
pub use adapters::storage::LocalStorage;
pub use config::{EmailSettings, TomlConfig};
pub use core::{atm::AutomatedTellerMachine, bank::Bank, manager::AtmManager};
pub use domain::model::{Account, AtmEvent, EventKind, Notification, Outcome, PinHash};
pub use domain::ports::{MailTransport, NotificationSender};
pub use utils::error::{AtmError, Result};
