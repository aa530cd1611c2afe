pub mod bootstrap;
pub mod console;

pub use bootstrap::{build_bank, build_notification_sender};
pub use console::{AtmMenuOption, Console, MainMenuOption};
