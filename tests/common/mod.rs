#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use atm_bank::{Account, AtmError, AutomatedTellerMachine, Bank, MailTransport, Notification, NotificationSender, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Keeps every notification it receives.
#[derive(Clone, Default)]
pub struct RecordingSender {
    pub received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSender {
    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }
}

impl NotificationSender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    fn send(&self, notification: &Notification) -> Result<()> {
        self.received.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Always fails, like an unreachable SMTP server.
pub struct FailingSender;

impl NotificationSender for FailingSender {
    fn name(&self) -> &str {
        "failing"
    }

    fn send(&self, _notification: &Notification) -> Result<()> {
        Err(AtmError::Notification {
            message: "connection refused".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn deliver(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.fail {
            return Err(AtmError::Notification {
                message: "SMTP 421 service not available".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMail {
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub fn account(name: &str, card: &str, pin: &str, balance: Decimal) -> Account {
    Account::new(name, Some(format!("{}@example.com", card)), card, pin, balance).unwrap()
}

/// ATM001 holds 500, ATM002 holds 150000; accounts 1234 (1000), 4321 (2000), 1111 (1500).
pub fn stereo_bank(sender: Arc<dyn NotificationSender>) -> Bank {
    let mut bank = Bank::new("StereoBank");
    bank.add_atm(AutomatedTellerMachine::new("ATM001", "Main Street", dec!(500)).unwrap());
    bank.add_atm(AutomatedTellerMachine::new("ATM002", "Park Avenue", dec!(150000)).unwrap());
    bank.add_account(account("John Doe", "1234", "1234", dec!(1000)), Arc::clone(&sender));
    bank.add_account(account("Jane Smith", "4321", "4321", dec!(2000)), Arc::clone(&sender));
    bank.add_account(account("Bob Johnson", "1111", "1111", dec!(1500)), sender);
    bank
}
