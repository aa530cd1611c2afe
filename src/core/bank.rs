use std::collections::HashMap;
use std::sync::Arc;

use crate::core::atm::AutomatedTellerMachine;
use crate::core::manager::AtmManager;
use crate::domain::model::Account;
use crate::domain::ports::NotificationSender;
use crate::utils::error::{AtmError, Result};

/// Registry of ATMs and accounts. Accounts live in a vector indexed by card
/// number; they are never removed, so an index stays valid for the whole run.
pub struct Bank {
    name: String,
    atms: Vec<AutomatedTellerMachine>,
    accounts: Vec<Account>,
    by_card: HashMap<String, usize>,
    senders: HashMap<String, Arc<dyn NotificationSender>>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            atms: Vec::new(),
            accounts: Vec::new(),
            by_card: HashMap::new(),
            senders: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_atm(&mut self, atm: AutomatedTellerMachine) {
        tracing::debug!(atm = %atm.id(), location = %atm.location(), "registered ATM");
        self.atms.push(atm);
    }

    /// Registers an account, replacing any account with the same card number.
    pub fn add_account(&mut self, account: Account, notification_sender: Arc<dyn NotificationSender>) {
        let card = account.card_number().to_string();
        match self.by_card.get(&card) {
            Some(&index) => {
                tracing::warn!(card = %card, "replacing existing account");
                self.accounts[index] = account;
            }
            None => {
                self.by_card.insert(card.clone(), self.accounts.len());
                self.accounts.push(account);
            }
        }
        tracing::debug!(card = %card, sender = notification_sender.name(), "registered account");
        self.senders.insert(card, notification_sender);
    }

    pub fn get_account(&self, card_number: &str) -> Option<&Account> {
        self.account_index(card_number).map(|i| &self.accounts[i])
    }

    pub fn atms(&self) -> &[AutomatedTellerMachine] {
        &self.atms
    }

    pub fn atm(&self, atm_id: &str) -> Option<&AutomatedTellerMachine> {
        self.atms.iter().find(|a| a.id() == atm_id)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Opens a session on the given ATM. The manager borrows the bank until it is dropped.
    pub fn create_atm_manager(
        &mut self,
        atm_id: &str,
        notification_sender: Arc<dyn NotificationSender>,
    ) -> Result<AtmManager<'_>> {
        let atm_index = self
            .atms
            .iter()
            .position(|a| a.id() == atm_id)
            .ok_or_else(|| AtmError::AtmNotFound {
                atm_id: atm_id.to_string(),
            })?;
        Ok(AtmManager::new(self, atm_index, notification_sender))
    }

    pub(crate) fn account_index(&self, card_number: &str) -> Option<usize> {
        self.by_card.get(card_number).copied()
    }

    pub(crate) fn account_at(&self, index: usize) -> &Account {
        &self.accounts[index]
    }

    pub(crate) fn atm_at(&self, index: usize) -> &AutomatedTellerMachine {
        &self.atms[index]
    }

    pub(crate) fn sender_for(&self, card_number: &str) -> Option<Arc<dyn NotificationSender>> {
        self.senders.get(card_number).cloned()
    }

    pub(crate) fn atm_and_account_mut(
        &mut self,
        atm_index: usize,
        account_index: usize,
    ) -> (&mut AutomatedTellerMachine, &mut Account) {
        (&mut self.atms[atm_index], &mut self.accounts[account_index])
    }

    /// Two distinct accounts at once; `None` when both indices are the same,
    /// which callers handle as a transfer to the same account.
    pub(crate) fn atm_and_account_pair_mut(
        &mut self,
        atm_index: usize,
        from: usize,
        to: usize,
    ) -> Option<(&AutomatedTellerMachine, &mut Account, &mut Account)> {
        if from == to {
            return None;
        }
        let atm = &self.atms[atm_index];
        let (from_acc, to_acc) = if from < to {
            let (head, tail) = self.accounts.split_at_mut(to);
            (&mut head[from], &mut tail[0])
        } else {
            let (head, tail) = self.accounts.split_at_mut(from);
            (&mut tail[0], &mut head[to])
        };
        Some((atm, from_acc, to_acc))
    }
}
