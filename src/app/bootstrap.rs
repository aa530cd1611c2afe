use std::sync::Arc;

use crate::adapters::notification::{DisplayNotificationSender, EmailNotificationSender, MultiNotificationSender};
use crate::adapters::storage::LocalStorage;
use crate::config::toml_config::TomlConfig;
use crate::core::bank::Bank;
use crate::domain::ports::NotificationSender;
use crate::utils::error::Result;

/// Display first, then email when enabled.
pub fn build_notification_sender(config: &TomlConfig, email_enabled: bool) -> MultiNotificationSender {
    let mut sender = MultiNotificationSender::default().with(DisplayNotificationSender::new());

    match config.email.as_ref() {
        Some(settings) if email_enabled => {
            tracing::info!(server = %settings.smtp_server, port = settings.smtp_port, "email notifications enabled");
            sender = sender.with(EmailNotificationSender::smtp(settings.clone()));
        }
        _ => tracing::info!("email notifications disabled"),
    }

    sender
}

/// Loads the ATM and account seed files once and registers everything.
pub fn build_bank(config: &TomlConfig, storage: &LocalStorage, sender: Arc<dyn NotificationSender>) -> Result<Bank> {
    let mut bank = Bank::new(config.bank.name.as_str());

    for atm in storage.load_atms(&config.bank.atms_file)? {
        bank.add_atm(atm);
    }

    for account in storage.load_accounts(&config.bank.accounts_file)? {
        bank.add_account(account, Arc::clone(&sender));
    }

    tracing::info!(
        bank = %bank.name(),
        atms = bank.atms().len(),
        accounts = bank.account_count(),
        "bank initialized"
    );
    Ok(bank)
}
