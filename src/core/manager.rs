use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::atm::AutomatedTellerMachine;
use crate::core::bank::Bank;
use crate::domain::model::{Account, AtmEvent, Notification};
use crate::domain::ports::NotificationSender;
use crate::utils::error::{AtmError, Result};

type Listener<'a> = Box<dyn FnMut(&str) + 'a>;

/// One session at one ATM. Every ATM outcome is handed to the listeners first
/// and then dispatched as a notification through the session sender.
pub struct AtmManager<'a> {
    bank: &'a mut Bank,
    atm_index: usize,
    current: Option<usize>,
    notification_sender: Arc<dyn NotificationSender>,
    listeners: Vec<Listener<'a>>,
}

impl<'a> AtmManager<'a> {
    pub(crate) fn new(bank: &'a mut Bank, atm_index: usize, notification_sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            bank,
            atm_index,
            current: None,
            notification_sender,
            listeners: Vec::new(),
        }
    }

    /// Registers a callback that receives the message of every event.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + 'a,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn atm(&self) -> &AutomatedTellerMachine {
        self.bank.atm_at(self.atm_index)
    }

    pub fn bank_name(&self) -> &str {
        self.bank.name()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current.map(|i| self.bank.account_at(i))
    }

    /// Unknown cards fail quietly and leave the session as it was.
    pub fn authenticate(&mut self, card_number: &str, pin: &str) -> bool {
        let Some(index) = self.bank.account_index(card_number) else {
            tracing::debug!(card = %card_number, "authentication for unknown card");
            return false;
        };

        let outcome = self
            .bank
            .atm_at(self.atm_index)
            .authenticate(self.bank.account_at(index), pin);
        if outcome.value {
            self.current = Some(index);
        }
        self.publish_for(index, &outcome.event);
        outcome.value
    }

    pub fn logout(&mut self) {
        if let Some(account) = self.current_account() {
            tracing::debug!(card = %account.card_number(), "session closed");
        }
        self.current = None;
    }

    pub fn greet_user(&mut self) -> Result<String> {
        let index = self.require_account()?;
        let outcome = self.bank.atm_at(self.atm_index).greet_user(self.bank.account_at(index));
        self.publish_for(index, &outcome.event);
        Ok(outcome.value)
    }

    pub fn available_cash(&mut self) -> Decimal {
        let outcome = self.bank.atm_at(self.atm_index).available_cash();
        let recipient = self.current_account().and_then(Account::email).map(str::to_string);
        self.publish(&outcome.event, recipient.as_deref());
        outcome.value
    }

    pub fn check_balance(&mut self) -> Result<Decimal> {
        let index = self.require_account()?;
        let outcome = self.bank.atm_at(self.atm_index).check_balance(self.bank.account_at(index));
        self.publish_for(index, &outcome.event);
        Ok(outcome.value)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<bool> {
        let index = self.require_account()?;
        let (atm, account) = self.bank.atm_and_account_mut(self.atm_index, index);
        let outcome = atm.withdraw(account, amount);
        self.publish_for(index, &outcome.event);
        Ok(outcome.value)
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<bool> {
        let index = self.require_account()?;
        let (atm, account) = self.bank.atm_and_account_mut(self.atm_index, index);
        let outcome = atm.deposit(account, amount);
        self.publish_for(index, &outcome.event);
        Ok(outcome.value)
    }

    /// An unknown destination is a user error at the session level: it is
    /// shown to listeners but produces no notification.
    pub fn transfer(&mut self, to_card_number: &str, amount: Decimal) -> Result<bool> {
        let from = self.require_account()?;

        let Some(to) = self.bank.account_index(to_card_number) else {
            let message = format!("Transfer failed: card {} not found.", to_card_number);
            tracing::info!(card = %to_card_number, "transfer to unknown card");
            self.notify_listeners(&message);
            return Ok(false);
        };

        let outcome = match self.bank.atm_and_account_pair_mut(self.atm_index, from, to) {
            Some((atm, from_account, to_account)) => atm.transfer(from_account, to_account, amount),
            None => self
                .bank
                .atm_at(self.atm_index)
                .transfer_to_self(self.bank.account_at(from), amount),
        };

        self.publish_for(from, &outcome.event);
        if outcome.value {
            self.notify_recipient(to, &outcome.event);
        }
        Ok(outcome.value)
    }

    fn require_account(&self) -> Result<usize> {
        self.current.ok_or(AtmError::NotAuthenticated)
    }

    fn publish_for(&mut self, account_index: usize, event: &AtmEvent) {
        let recipient = self.bank.account_at(account_index).email().map(str::to_string);
        self.publish(event, recipient.as_deref());
    }

    fn publish(&mut self, event: &AtmEvent, recipient_email: Option<&str>) {
        self.notify_listeners(&event.message);
        let notification = Notification::from_event(event, recipient_email);
        dispatch(self.notification_sender.as_ref(), &notification);
    }

    fn notify_listeners(&mut self, message: &str) {
        for listener in self.listeners.iter_mut() {
            listener(message);
        }
    }

    // The receiving side of a transfer hears about it through the sender it
    // was registered with.
    fn notify_recipient(&self, account_index: usize, event: &AtmEvent) {
        let account = self.bank.account_at(account_index);
        if let Some(sender) = self.bank.sender_for(account.card_number()) {
            let notification = Notification::from_event(event, account.email());
            dispatch(sender.as_ref(), &notification);
        }
    }
}

fn dispatch(sender: &dyn NotificationSender, notification: &Notification) {
    if let Err(e) = sender.send(notification) {
        tracing::warn!(
            sender = sender.name(),
            kind = %notification.kind,
            error = %e,
            "notification could not be delivered"
        );
    }
}
