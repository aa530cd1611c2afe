pub mod display;
pub mod email;
pub mod multi;

pub use display::DisplayNotificationSender;
pub use email::{EmailNotificationSender, SmtpMailer};
pub use multi::MultiNotificationSender;
