use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::bank::Bank;
use crate::core::manager::AtmManager;
use crate::domain::ports::NotificationSender;
use crate::utils::error::Result;

const CHOOSE_OPTION: &str = "Choose an option: ";
const INVALID_OPTION: &str = "Invalid option!";
const INVALID_AMOUNT: &str = "Invalid amount entered!";
const EXIT_KEY: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOption {
    SelectAtm = 1,
    Exit = 2,
}

impl MainMenuOption {
    pub const ALL: [MainMenuOption; 2] = [MainMenuOption::SelectAtm, MainMenuOption::Exit];

    pub fn description(&self) -> &'static str {
        match self {
            MainMenuOption::SelectAtm => "Select ATM",
            MainMenuOption::Exit => "Exit",
        }
    }

    pub fn from_input(input: &str) -> Option<Self> {
        let n: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|o| *o as u8 == n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtmMenuOption {
    CheckBalance = 1,
    Withdraw = 2,
    Deposit = 3,
    Transfer = 4,
    Logout = 5,
}

impl AtmMenuOption {
    pub const ALL: [AtmMenuOption; 5] = [
        AtmMenuOption::CheckBalance,
        AtmMenuOption::Withdraw,
        AtmMenuOption::Deposit,
        AtmMenuOption::Transfer,
        AtmMenuOption::Logout,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            AtmMenuOption::CheckBalance => "Check Balance",
            AtmMenuOption::Withdraw => "Withdraw",
            AtmMenuOption::Deposit => "Deposit",
            AtmMenuOption::Transfer => "Transfer",
            AtmMenuOption::Logout => "Logout",
        }
    }

    pub fn from_input(input: &str) -> Option<Self> {
        let n: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|o| *o as u8 == n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Quit,
}

type Inbox = Rc<RefCell<Vec<String>>>;

/// Text front-end. Reads commands line by line; end of input quits cleanly.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self, bank: &mut Bank, sender: Arc<dyn NotificationSender>) -> Result<()> {
        loop {
            writeln!(self.output, "Welcome to {} ATM System!", bank.name())?;
            for option in MainMenuOption::ALL {
                writeln!(self.output, "{}. {}", option as u8, option.description())?;
            }
            write!(self.output, "{}", CHOOSE_OPTION)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(());
            };

            match MainMenuOption::from_input(&line) {
                Some(MainMenuOption::SelectAtm) => {
                    if self.select_atm(bank, &sender)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Some(MainMenuOption::Exit) => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                None => writeln!(self.output, "{}", INVALID_OPTION)?,
            }
        }
    }

    fn select_atm(&mut self, bank: &mut Bank, sender: &Arc<dyn NotificationSender>) -> Result<Flow> {
        loop {
            writeln!(self.output, "Select an ATM:")?;
            for (i, atm) in bank.atms().iter().enumerate() {
                writeln!(self.output, "{}. {} - ${} available.", i + 1, atm.location(), atm.cash())?;
            }
            let back = bank.atms().len() + 1;
            writeln!(self.output, "{}. Back to main menu", back)?;
            write!(self.output, "{}", CHOOSE_OPTION)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(Flow::Quit);
            };

            match line.parse::<usize>() {
                Ok(choice) if choice == back => return Ok(Flow::Back),
                Ok(choice) if (1..back).contains(&choice) => {
                    let atm_id = bank.atms()[choice - 1].id().to_string();
                    let mut manager = bank.create_atm_manager(&atm_id, Arc::clone(sender))?;
                    if self.run_atm(&mut manager)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                _ => writeln!(self.output, "{}", INVALID_OPTION)?,
            }
        }
    }

    fn run_atm(&mut self, manager: &mut AtmManager<'_>) -> Result<Flow> {
        let inbox: Inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&inbox);
        manager.on_event(move |message| sink.borrow_mut().push(message.to_string()));

        loop {
            write!(self.output, "Enter card number or '{}' to go back: ", EXIT_KEY)?;
            self.output.flush()?;
            let Some(card_number) = self.read_line()? else {
                return Ok(Flow::Quit);
            };
            if card_number.eq_ignore_ascii_case(EXIT_KEY) {
                return Ok(Flow::Back);
            }

            write!(self.output, "Enter your pin: ")?;
            self.output.flush()?;
            let Some(pin) = self.read_line()? else {
                return Ok(Flow::Quit);
            };

            if manager.authenticate(&card_number, &pin) {
                self.flush_events(&inbox)?;
                if self.run_session(manager, &inbox)? == Flow::Quit {
                    return Ok(Flow::Quit);
                }
            } else {
                self.flush_events(&inbox)?;
                writeln!(self.output, "Invalid card number or PIN")?;
            }
        }
    }

    fn run_session(&mut self, manager: &mut AtmManager<'_>, inbox: &Inbox) -> Result<Flow> {
        loop {
            manager.greet_user()?;
            self.flush_events(inbox)?;
            for option in AtmMenuOption::ALL {
                writeln!(self.output, "{}. {}", option as u8, option.description())?;
            }
            write!(self.output, "{}", CHOOSE_OPTION)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                manager.logout();
                return Ok(Flow::Quit);
            };

            match AtmMenuOption::from_input(&line) {
                Some(AtmMenuOption::Logout) => {
                    manager.logout();
                    return Ok(Flow::Back);
                }
                Some(option) => self.dispatch(option, manager)?,
                None => writeln!(self.output, "{}", INVALID_OPTION)?,
            }
            self.flush_events(inbox)?;
        }
    }

    /// Menu option to handler. `Logout` is handled by the session loop.
    fn dispatch(&mut self, option: AtmMenuOption, manager: &mut AtmManager<'_>) -> Result<()> {
        match option {
            AtmMenuOption::CheckBalance => {
                manager.check_balance()?;
            }
            AtmMenuOption::Withdraw => self.perform_withdrawal(manager)?,
            AtmMenuOption::Deposit => self.perform_deposit(manager)?,
            AtmMenuOption::Transfer => self.perform_transfer(manager)?,
            AtmMenuOption::Logout => manager.logout(),
        }
        Ok(())
    }

    fn perform_withdrawal(&mut self, manager: &mut AtmManager<'_>) -> Result<()> {
        manager.available_cash();
        if let Some(amount) = self.read_amount("Enter amount to withdraw: ")? {
            manager.withdraw(amount)?;
        }
        Ok(())
    }

    fn perform_deposit(&mut self, manager: &mut AtmManager<'_>) -> Result<()> {
        if let Some(amount) = self.read_amount("Enter amount to deposit: ")? {
            manager.deposit(amount)?;
        }
        Ok(())
    }

    fn perform_transfer(&mut self, manager: &mut AtmManager<'_>) -> Result<()> {
        write!(self.output, "Enter recipient's card number: ")?;
        self.output.flush()?;
        let Some(to_card) = self.read_line()? else {
            return Ok(());
        };
        if let Some(amount) = self.read_amount("Enter amount to transfer: ")? {
            manager.transfer(&to_card, amount)?;
        }
        Ok(())
    }

    fn read_amount(&mut self, prompt: &str) -> Result<Option<Decimal>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let Some(line) = self.read_line()? else {
            return Ok(None);
        };
        match line.parse::<Decimal>() {
            Ok(amount) => Ok(Some(amount)),
            Err(_) => {
                writeln!(self.output, "{}", INVALID_AMOUNT)?;
                Ok(None)
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn flush_events(&mut self, inbox: &Inbox) -> Result<()> {
        for message in inbox.borrow_mut().drain(..) {
            writeln!(self.output, "{}", message)?;
        }
        Ok(())
    }
}
