use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::atm::AutomatedTellerMachine;
use crate::domain::model::{Account, PinHash};
use crate::utils::error::{AtmError, Result};

/// Reads seed lists from JSON files relative to a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        fs::read(&full_path).map_err(|e| {
            tracing::error!(path = %full_path.display(), error = %e, "cannot read data file");
            AtmError::Io(e)
        })
    }

    /// Loads a JSON array of `T`.
    pub fn load_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let data = self.read_file(path)?;
        let items: Vec<T> = serde_json::from_slice(&data)?;
        tracing::debug!(path = %path, count = items.len(), "loaded seed list");
        Ok(items)
    }

    pub fn load_atms(&self, path: &str) -> Result<Vec<AutomatedTellerMachine>> {
        self.load_list::<AtmRecord>(path)?
            .into_iter()
            .map(AutomatedTellerMachine::try_from)
            .collect()
    }

    pub fn load_accounts(&self, path: &str) -> Result<Vec<Account>> {
        self.load_list::<AccountRecord>(path)?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmRecord {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(default, alias = "Location")]
    pub location: String,
    #[serde(alias = "AvailableCash")]
    pub available_cash: Decimal,
}

/// Either `pin` or `pinHash` must be present; `pinHash` wins when both are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(alias = "FullName", alias = "owner")]
    pub full_name: String,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    #[serde(alias = "CardNumber")]
    pub card_number: String,
    #[serde(default, alias = "Pin")]
    pub pin: Option<String>,
    #[serde(default, alias = "PinHash")]
    pub pin_hash: Option<String>,
    #[serde(alias = "Balance")]
    pub balance: Decimal,
}

impl TryFrom<AtmRecord> for AutomatedTellerMachine {
    type Error = AtmError;

    fn try_from(record: AtmRecord) -> Result<Self> {
        AutomatedTellerMachine::new(record.id, record.location, record.available_cash)
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = AtmError;

    fn try_from(record: AccountRecord) -> Result<Self> {
        let pin_hash = match (&record.pin_hash, &record.pin) {
            (Some(hash), _) => PinHash::from_hex(hash)?,
            (None, Some(pin)) => PinHash::from_pin(&record.card_number, pin),
            (None, None) => {
                return Err(AtmError::Validation {
                    message: format!("account {} has neither pin nor pinHash", record.card_number),
                })
            }
        };
        Account::with_pin_hash(record.full_name, record.email, record.card_number, pin_hash, record.balance)
    }
}
