use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::utils::error::{AtmError, Result};

/// Hex encoded SHA-256 of `card_number:pin`. Salting with the card number keeps
/// two accounts with the same PIN from sharing a hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinHash(String);

impl PinHash {
    pub fn from_pin(card_number: &str, pin: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{}", card_number, pin));
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wraps a hash computed elsewhere (seed files may ship hashes instead of PINs).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim().to_ascii_lowercase();
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AtmError::Validation {
                message: "PIN hash must be 64 hex characters".to_string(),
            });
        }
        Ok(Self(hex))
    }

    pub fn verify(&self, card_number: &str, pin: &str) -> bool {
        *self == Self::from_pin(card_number, pin)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the hash, not even in debug output.
impl fmt::Debug for PinHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinHash(***)")
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    full_name: String,
    email: Option<String>,
    card_number: String,
    pin_hash: PinHash,
    balance: Decimal,
}

impl Account {
    pub fn new(
        full_name: impl Into<String>,
        email: Option<String>,
        card_number: impl Into<String>,
        pin: &str,
        balance: Decimal,
    ) -> Result<Self> {
        let card_number = card_number.into();
        let pin_hash = PinHash::from_pin(&card_number, pin);
        Self::with_pin_hash(full_name, email, card_number, pin_hash, balance)
    }

    pub fn with_pin_hash(
        full_name: impl Into<String>,
        email: Option<String>,
        card_number: impl Into<String>,
        pin_hash: PinHash,
        balance: Decimal,
    ) -> Result<Self> {
        let card_number = card_number.into();
        if card_number.trim().is_empty() {
            return Err(AtmError::Validation {
                message: "card number cannot be empty".to_string(),
            });
        }
        if balance < Decimal::ZERO {
            return Err(AtmError::Validation {
                message: format!("opening balance for card {} is negative: {}", card_number, balance),
            });
        }

        Ok(Self {
            full_name: full_name.into(),
            email: email.filter(|e| !e.trim().is_empty()),
            card_number,
            pin_hash,
            balance,
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn verify_pin(&self, pin: &str) -> bool {
        self.pin_hash.verify(&self.card_number, pin)
    }

    /// Whether `update_balance(amount)` would succeed.
    pub fn can_apply(&self, amount: Decimal) -> bool {
        self.balance
            .checked_add(amount)
            .is_some_and(|next| next >= Decimal::ZERO)
    }

    /// Applies `balance += amount` unless that would leave the balance negative
    /// or overflow.
    pub fn update_balance(&mut self, amount: Decimal) -> bool {
        match self.balance.checked_add(amount) {
            Some(next) if next >= Decimal::ZERO => {
                self.balance = next;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Authentication,
    UserGreeting,
    AvailableCash,
    BalanceCheck,
    Withdrawal,
    Deposit,
    Transfer,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Authentication => "Authentication",
            EventKind::UserGreeting => "User Greeting",
            EventKind::AvailableCash => "Get Available Cash",
            EventKind::BalanceCheck => "Balance Check",
            EventKind::Withdrawal => "Withdrawal",
            EventKind::Deposit => "Deposit",
            EventKind::Transfer => "Transfer",
        }
    }

    /// Mutating operations are the ones worth an email.
    pub fn is_mutating(&self) -> bool {
        matches!(self, EventKind::Withdrawal | EventKind::Deposit | EventKind::Transfer)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtmEvent {
    pub kind: EventKind,
    pub message: String,
}

impl AtmEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// What an ATM operation produced, plus the one event describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub event: AtmEvent,
}

impl<T> Outcome<T> {
    pub fn new(value: T, kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            value,
            event: AtmEvent::new(kind, message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: EventKind,
    pub message: String,
    pub recipient_email: Option<String>,
    pub send_email: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_event(event: &AtmEvent, recipient_email: Option<&str>) -> Self {
        Self {
            kind: event.kind,
            message: event.message.clone(),
            recipient_email: recipient_email.map(str::to_string),
            send_email: event.kind.is_mutating(),
            created_at: Utc::now(),
        }
    }
}
