use rust_decimal::Decimal;

use crate::domain::model::{Account, EventKind, Outcome};
use crate::utils::error::{AtmError, Result};

/// Cash dispensing policy. The only state kept between calls is the cash pool;
/// every operation reports its result together with one event message.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomatedTellerMachine {
    id: String,
    location: String,
    available_cash: Decimal,
}

impl AutomatedTellerMachine {
    pub fn new(id: impl Into<String>, location: impl Into<String>, available_cash: Decimal) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AtmError::Validation {
                message: "ATM id cannot be empty".to_string(),
            });
        }
        if available_cash < Decimal::ZERO {
            return Err(AtmError::Validation {
                message: format!("ATM {} starts with negative cash: {}", id, available_cash),
            });
        }

        Ok(Self {
            id,
            location: location.into(),
            available_cash,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn cash(&self) -> Decimal {
        self.available_cash
    }

    pub fn authenticate(&self, account: &Account, pin: &str) -> Outcome<bool> {
        let ok = account.verify_pin(pin);
        let message = if ok {
            format!("Authentication successful for card {}!", account.card_number())
        } else {
            format!("Authentication failed for card {}!", account.card_number())
        };
        tracing::debug!(atm = %self.id, card = %account.card_number(), ok, "authentication attempt");
        Outcome::new(ok, EventKind::Authentication, message)
    }

    pub fn greet_user(&self, account: &Account) -> Outcome<String> {
        let name = account.full_name().to_string();
        let message = format!("Welcome, {}!", name);
        Outcome::new(name, EventKind::UserGreeting, message)
    }

    pub fn available_cash(&self) -> Outcome<Decimal> {
        Outcome::new(
            self.available_cash,
            EventKind::AvailableCash,
            format!("Available cash in ATM: ${}.", self.available_cash),
        )
    }

    pub fn check_balance(&self, account: &Account) -> Outcome<Decimal> {
        Outcome::new(
            account.balance(),
            EventKind::BalanceCheck,
            format!("Current balance for card {}: ${}.", account.card_number(), account.balance()),
        )
    }

    pub fn withdraw(&mut self, account: &mut Account, amount: Decimal) -> Outcome<bool> {
        let kind = EventKind::Withdrawal;

        if amount <= Decimal::ZERO {
            return Outcome::new(false, kind, format!("Withdrawal failed: Invalid amount ${}!", amount));
        }

        if amount > self.available_cash {
            return Outcome::new(
                false,
                kind,
                format!(
                    "Withdrawal failed: Insufficient funds in ATM! Available: ${}.",
                    self.available_cash
                ),
            );
        }

        if amount > account.balance() {
            return Outcome::new(
                false,
                kind,
                format!(
                    "Withdrawal failed: Insufficient funds in account! Available: ${}.",
                    account.balance()
                ),
            );
        }

        if account.update_balance(-amount) {
            self.available_cash -= amount;
            tracing::info!(atm = %self.id, card = %account.card_number(), %amount, "withdrawal");
            return Outcome::new(
                true,
                kind,
                format!("Successfully withdrawn ${} from card {}.", amount, account.card_number()),
            );
        }

        Outcome::new(
            false,
            kind,
            format!("Withdrawal failed for card {}!", account.card_number()),
        )
    }

    pub fn deposit(&mut self, account: &mut Account, amount: Decimal) -> Outcome<bool> {
        let kind = EventKind::Deposit;

        if amount <= Decimal::ZERO {
            return Outcome::new(false, kind, format!("Deposit failed: Invalid amount ${}!", amount));
        }

        let Some(cash) = self.available_cash.checked_add(amount) else {
            tracing::warn!(atm = %self.id, %amount, "deposit would overflow the cash pool");
            return Outcome::new(false, kind, format!("Deposit failed for card {}!", account.card_number()));
        };

        if account.update_balance(amount) {
            self.available_cash = cash;
            tracing::info!(atm = %self.id, card = %account.card_number(), %amount, "deposit");
            return Outcome::new(
                true,
                kind,
                format!("Successfully deposited ${} to card {}.", amount, account.card_number()),
            );
        }

        Outcome::new(false, kind, format!("Deposit failed for card {}!", account.card_number()))
    }

    /// Moves money between two accounts. Both legs are checked before either
    /// is applied, so a rejected transfer leaves both balances untouched.
    pub fn transfer(&self, from: &mut Account, to: &mut Account, amount: Decimal) -> Outcome<bool> {
        if let Some(rejected) = Self::reject_transfer(from, amount) {
            return rejected;
        }
        let kind = EventKind::Transfer;

        if from.can_apply(-amount) && to.can_apply(amount) {
            let debited = from.update_balance(-amount);
            let credited = to.update_balance(amount);
            if debited && credited {
                tracing::info!(
                    atm = %self.id,
                    from = %from.card_number(),
                    to = %to.card_number(),
                    %amount,
                    "transfer"
                );
                return Outcome::new(
                    true,
                    kind,
                    format!(
                        "Successfully transferred ${} from card {} to card {}!",
                        amount,
                        from.card_number(),
                        to.card_number()
                    ),
                );
            }
        }

        Outcome::new(
            false,
            kind,
            format!(
                "Transfer failed between cards {} and {}!",
                from.card_number(),
                to.card_number()
            ),
        )
    }

    /// A transfer whose source and destination are the same account. It is
    /// checked like any other transfer and leaves the balance as it was.
    pub fn transfer_to_self(&self, account: &Account, amount: Decimal) -> Outcome<bool> {
        if let Some(rejected) = Self::reject_transfer(account, amount) {
            return rejected;
        }
        tracing::info!(atm = %self.id, card = %account.card_number(), %amount, "transfer to own card");
        Outcome::new(
            true,
            EventKind::Transfer,
            format!(
                "Successfully transferred ${} from card {} to card {}!",
                amount,
                account.card_number(),
                account.card_number()
            ),
        )
    }

    fn reject_transfer(from: &Account, amount: Decimal) -> Option<Outcome<bool>> {
        let kind = EventKind::Transfer;

        if amount <= Decimal::ZERO {
            return Some(Outcome::new(
                false,
                kind,
                format!("Transfer failed: Invalid amount ${}.", amount),
            ));
        }

        if amount > from.balance() {
            return Some(Outcome::new(
                false,
                kind,
                format!(
                    "Transfer failed: Insufficient funds! Requested: ${}, Available: ${}.",
                    amount,
                    from.balance()
                ),
            ));
        }

        None
    }
}
