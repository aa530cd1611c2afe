mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use atm_bank::{AtmError, EventKind, NotificationSender};
use common::{stereo_bank, FailingSender, RecordingSender};
use rust_decimal_macros::dec;

fn recording() -> (RecordingSender, Arc<dyn NotificationSender>) {
    let recorder = RecordingSender::default();
    let sender: Arc<dyn NotificationSender> = Arc::new(recorder.clone());
    (recorder, sender)
}

#[test]
fn test_operations_before_authentication_fail_explicitly() -> Result<()> {
    let (_, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let mut manager = bank.create_atm_manager("ATM001", sender)?;

    assert!(!manager.is_authenticated());
    assert!(matches!(manager.greet_user(), Err(AtmError::NotAuthenticated)));
    assert!(matches!(manager.check_balance(), Err(AtmError::NotAuthenticated)));
    assert!(matches!(manager.withdraw(dec!(10)), Err(AtmError::NotAuthenticated)));
    assert!(matches!(manager.deposit(dec!(10)), Err(AtmError::NotAuthenticated)));
    assert!(matches!(manager.transfer("4321", dec!(10)), Err(AtmError::NotAuthenticated)));

    // cash is public information
    assert_eq!(manager.available_cash(), dec!(500));
    Ok(())
}

#[test]
fn test_unknown_card_leaves_session_unchanged() -> Result<()> {
    let (recorder, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let mut manager = bank.create_atm_manager("ATM001", sender)?;

    assert!(!manager.authenticate("9999", "9999"));
    assert!(!manager.is_authenticated());
    assert!(recorder.notifications().is_empty());

    assert!(manager.authenticate("1234", "1234"));
    assert!(!manager.authenticate("9999", "9999"));
    assert_eq!(manager.current_account().unwrap().card_number(), "1234");
    Ok(())
}

#[test]
fn test_wrong_pin_is_rejected_and_published() -> Result<()> {
    let (recorder, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let mut manager = bank.create_atm_manager("ATM001", sender)?;

    assert!(!manager.authenticate("1234", "0000"));
    assert!(!manager.is_authenticated());

    let notifications = recorder.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, EventKind::Authentication);
    assert_eq!(notifications[0].message, "Authentication failed for card 1234!");
    assert!(!notifications[0].send_email);
    Ok(())
}

#[test]
fn test_withdraw_scenarios_through_session() -> Result<()> {
    let (recorder, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    {
        let mut manager = bank.create_atm_manager("ATM001", sender)?;
        assert!(manager.authenticate("1234", "1234"));

        assert!(!manager.withdraw(dec!(600))?);
        assert_eq!(manager.check_balance()?, dec!(1000));
        assert_eq!(manager.atm().cash(), dec!(500));

        assert!(manager.withdraw(dec!(200))?);
        assert_eq!(manager.check_balance()?, dec!(800));
        assert_eq!(manager.atm().cash(), dec!(300));
    }

    assert_eq!(bank.get_account("1234").unwrap().balance(), dec!(800));
    assert_eq!(bank.atm("ATM001").unwrap().cash(), dec!(300));

    let withdrawals: Vec<_> = recorder
        .notifications()
        .into_iter()
        .filter(|n| n.kind == EventKind::Withdrawal)
        .collect();
    assert_eq!(withdrawals.len(), 2);
    assert!(withdrawals.iter().all(|n| n.send_email));
    assert!(withdrawals
        .iter()
        .all(|n| n.recipient_email.as_deref() == Some("1234@example.com")));
    Ok(())
}

#[test]
fn test_deposit_negative_amount_changes_nothing() -> Result<()> {
    let (_, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let mut manager = bank.create_atm_manager("ATM002", sender)?;
    assert!(manager.authenticate("1111", "1111"));

    assert!(!manager.deposit(dec!(-5))?);
    assert_eq!(manager.check_balance()?, dec!(1500));
    assert_eq!(manager.atm().cash(), dec!(150000));

    assert!(manager.deposit(dec!(100))?);
    assert_eq!(manager.check_balance()?, dec!(1600));
    assert_eq!(manager.atm().cash(), dec!(150100));
    Ok(())
}

#[test]
fn test_transfer_conserves_total_and_notifies_recipient() -> Result<()> {
    let (recorder, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    {
        let mut manager = bank.create_atm_manager("ATM001", sender)?;
        assert!(manager.authenticate("1234", "1234"));
        assert!(manager.transfer("4321", dec!(100))?);
        assert_eq!(manager.atm().cash(), dec!(500));
    }

    let a = bank.get_account("1234").unwrap().balance();
    let b = bank.get_account("4321").unwrap().balance();
    assert_eq!(a, dec!(900));
    assert_eq!(b, dec!(2100));
    assert_eq!(a + b, dec!(3000));

    let transfers: Vec<_> = recorder
        .notifications()
        .into_iter()
        .filter(|n| n.kind == EventKind::Transfer)
        .collect();
    let recipients: Vec<_> = transfers.iter().map(|n| n.recipient_email.clone()).collect();
    assert_eq!(
        recipients,
        vec![
            Some("1234@example.com".to_string()),
            Some("4321@example.com".to_string())
        ]
    );
    assert_eq!(transfers[0].message, "Successfully transferred $100 from card 1234 to card 4321!");
    Ok(())
}

#[test]
fn test_transfer_to_unknown_card_returns_false() -> Result<()> {
    let (recorder, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let messages = Rc::new(RefCell::new(Vec::new()));
    {
        let mut manager = bank.create_atm_manager("ATM001", sender)?;
        let sink = Rc::clone(&messages);
        manager.on_event(move |m| sink.borrow_mut().push(m.to_string()));
        assert!(manager.authenticate("1234", "1234"));

        assert!(!manager.transfer("0000", dec!(100))?);
    }

    assert_eq!(bank.get_account("1234").unwrap().balance(), dec!(1000));
    assert!(recorder.notifications().iter().all(|n| n.kind != EventKind::Transfer));
    assert_eq!(messages.borrow().last().unwrap(), "Transfer failed: card 0000 not found.");
    Ok(())
}

#[test]
fn test_transfer_to_own_card_is_validated_like_any_transfer() -> Result<()> {
    let (_, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let messages = Rc::new(RefCell::new(Vec::new()));
    let mut manager = bank.create_atm_manager("ATM001", sender)?;
    let sink = Rc::clone(&messages);
    manager.on_event(move |m| sink.borrow_mut().push(m.to_string()));
    assert!(manager.authenticate("1234", "1234"));

    assert!(manager.transfer("1234", dec!(100))?);
    assert_eq!(
        messages.borrow().last().unwrap(),
        "Successfully transferred $100 from card 1234 to card 1234!"
    );

    assert!(!manager.transfer("1234", dec!(-5))?);
    assert_eq!(messages.borrow().last().unwrap(), "Transfer failed: Invalid amount $-5.");

    assert_eq!(manager.check_balance()?, dec!(1000));
    Ok(())
}

#[test]
fn test_transfer_over_balance_fails() -> Result<()> {
    let (_, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    {
        let mut manager = bank.create_atm_manager("ATM001", sender)?;
        assert!(manager.authenticate("1234", "1234"));
        assert!(!manager.transfer("4321", dec!(1000.01))?);
        assert!(!manager.transfer("4321", dec!(0))?);
    }

    assert_eq!(bank.get_account("1234").unwrap().balance(), dec!(1000));
    assert_eq!(bank.get_account("4321").unwrap().balance(), dec!(2000));
    Ok(())
}

#[test]
fn test_listeners_receive_messages_before_dispatch_in_order() -> Result<()> {
    let (recorder, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let messages = Rc::new(RefCell::new(Vec::new()));
    let mut manager = bank.create_atm_manager("ATM002", sender)?;
    let sink = Rc::clone(&messages);
    manager.on_event(move |m| sink.borrow_mut().push(m.to_string()));

    assert!(manager.authenticate("4321", "4321"));
    assert_eq!(manager.greet_user()?, "Jane Smith");
    manager.check_balance()?;
    manager.available_cash();

    assert_eq!(
        *messages.borrow(),
        vec![
            "Authentication successful for card 4321!".to_string(),
            "Welcome, Jane Smith!".to_string(),
            "Current balance for card 4321: $2000.".to_string(),
            "Available cash in ATM: $150000.".to_string(),
        ]
    );

    let notifications = recorder.notifications();
    assert_eq!(notifications.len(), 4);
    assert!(notifications.iter().all(|n| !n.send_email));
    assert!(notifications
        .iter()
        .all(|n| n.recipient_email.as_deref() == Some("4321@example.com")));
    Ok(())
}

#[test]
fn test_logout_ends_session() -> Result<()> {
    let (_, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let mut manager = bank.create_atm_manager("ATM001", sender)?;

    assert!(manager.authenticate("1234", "1234"));
    manager.logout();

    assert!(!manager.is_authenticated());
    assert!(matches!(manager.withdraw(dec!(10)), Err(AtmError::NotAuthenticated)));
    Ok(())
}

#[test]
fn test_failing_sender_does_not_undo_transaction() -> Result<()> {
    let sender: Arc<dyn NotificationSender> = Arc::new(FailingSender);
    let mut bank = stereo_bank(Arc::clone(&sender));
    {
        let mut manager = bank.create_atm_manager("ATM002", sender)?;
        assert!(manager.authenticate("1111", "1111"));
        assert!(manager.withdraw(dec!(500))?);
    }

    assert_eq!(bank.get_account("1111").unwrap().balance(), dec!(1000));
    assert_eq!(bank.atm("ATM002").unwrap().cash(), dec!(149500));
    Ok(())
}

#[test]
fn test_unknown_atm_id() {
    let (_, sender) = recording();
    let mut bank = stereo_bank(Arc::clone(&sender));
    let result = bank.create_atm_manager("ATM404", sender);
    assert!(matches!(result, Err(AtmError::AtmNotFound { .. })));
}
