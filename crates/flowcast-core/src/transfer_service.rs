//! Balance mutations with paired audit entries.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use flowcast_domain::{Book, Direction, EntryRecord};

use crate::CoreError;

/// Moves money between accounts and envelopes. Every mutation yields entry
/// records, transfers yield a matched debit/credit pair, and business-rule
/// failures are rejected before anything changes.
pub struct TransferService;

impl TransferService {
    pub fn deposit(
        book: &mut Book,
        account_id: Uuid,
        amount: f64,
        date: NaiveDate,
        memo: impl Into<String>,
    ) -> Result<EntryRecord, CoreError> {
        Self::check_amount(amount)?;
        let account = book
            .account_mut(account_id)
            .ok_or(CoreError::AccountNotFound(account_id))?;
        account.balance += amount;
        debug!(account = %account_id, amount, "deposit");
        Ok(EntryRecord::account_entry(
            date,
            account_id,
            amount,
            Direction::Credit,
            memo,
        ))
    }

    pub fn withdraw(
        book: &mut Book,
        account_id: Uuid,
        amount: f64,
        date: NaiveDate,
        memo: impl Into<String>,
    ) -> Result<EntryRecord, CoreError> {
        Self::check_amount(amount)?;
        let account = book
            .account_mut(account_id)
            .ok_or(CoreError::AccountNotFound(account_id))?;
        if account.balance - amount < account.minimum_balance() {
            return Err(CoreError::InsufficientFunds(format!(
                "account {} holds {:.2}, cannot withdraw {:.2}",
                account.name, account.balance, amount
            )));
        }
        account.balance -= amount;
        debug!(account = %account_id, amount, "withdrawal");
        Ok(EntryRecord::account_entry(
            date,
            account_id,
            amount,
            Direction::Debit,
            memo,
        ))
    }

    /// Assigns unclaimed account balance to an envelope. The account balance
    /// itself does not move; only its available portion shrinks.
    pub fn transfer_to_envelope(
        book: &mut Book,
        account_id: Uuid,
        envelope_id: Uuid,
        amount: f64,
        date: NaiveDate,
    ) -> Result<(EntryRecord, EntryRecord), CoreError> {
        Self::check_amount(amount)?;
        let available = book
            .available_in(account_id)
            .ok_or(CoreError::AccountNotFound(account_id))?;
        if book.envelope(envelope_id).is_none() {
            return Err(CoreError::EnvelopeNotFound(envelope_id));
        }
        if amount > available {
            return Err(CoreError::InsufficientFunds(format!(
                "account has {available:.2} available, cannot assign {amount:.2}"
            )));
        }
        let envelope = book
            .envelope_mut(envelope_id)
            .expect("envelope checked above");
        envelope.amount += amount;
        let memo = format!("Assigned to {}", envelope.name);
        debug!(account = %account_id, envelope = %envelope_id, amount, "assignment");
        Ok((
            EntryRecord::account_entry(date, account_id, amount, Direction::Debit, memo.clone()),
            EntryRecord::envelope_entry(date, envelope_id, amount, Direction::Credit, memo),
        ))
    }

    /// Spends from an envelope; the linked account pays the money out of the
    /// system.
    pub fn withdraw_from_envelope(
        book: &mut Book,
        envelope_id: Uuid,
        amount: f64,
        date: NaiveDate,
        memo: impl Into<String>,
    ) -> Result<Vec<EntryRecord>, CoreError> {
        Self::check_amount(amount)?;
        let envelope = book
            .envelope(envelope_id)
            .ok_or(CoreError::EnvelopeNotFound(envelope_id))?;
        if envelope.amount < amount {
            return Err(CoreError::InsufficientFunds(format!(
                "envelope {} holds {:.2}, cannot spend {:.2}",
                envelope.name, envelope.amount, amount
            )));
        }
        let linked = envelope.linked_account_id;
        let memo = memo.into();
        let mut records = Vec::new();
        if let Some(account_id) = linked {
            let account = book
                .account_mut(account_id)
                .ok_or(CoreError::AccountNotFound(account_id))?;
            account.balance -= amount;
            records.push(EntryRecord::account_entry(
                date,
                account_id,
                amount,
                Direction::Debit,
                memo.clone(),
            ));
        }
        let envelope = book
            .envelope_mut(envelope_id)
            .expect("envelope checked above");
        envelope.amount -= amount;
        records.push(EntryRecord::envelope_entry(
            date,
            envelope_id,
            amount,
            Direction::Debit,
            memo,
        ));
        Ok(records)
    }

    pub fn move_between_envelopes(
        book: &mut Book,
        from_id: Uuid,
        to_id: Uuid,
        amount: f64,
        date: NaiveDate,
    ) -> Result<(EntryRecord, EntryRecord), CoreError> {
        Self::check_amount(amount)?;
        if from_id == to_id {
            return Err(CoreError::InvalidOperation(
                "cannot move an envelope onto itself".into(),
            ));
        }
        let from = book
            .envelope(from_id)
            .ok_or(CoreError::EnvelopeNotFound(from_id))?;
        if from.amount < amount {
            return Err(CoreError::InsufficientFunds(format!(
                "envelope {} holds {:.2}, cannot move {:.2}",
                from.name, from.amount, amount
            )));
        }
        if book.envelope(to_id).is_none() {
            return Err(CoreError::EnvelopeNotFound(to_id));
        }
        let memo = "Envelope move".to_string();
        book.envelope_mut(from_id).expect("checked above").amount -= amount;
        book.envelope_mut(to_id).expect("checked above").amount += amount;
        Ok((
            EntryRecord::envelope_entry(date, from_id, amount, Direction::Debit, memo.clone()),
            EntryRecord::envelope_entry(date, to_id, amount, Direction::Credit, memo),
        ))
    }

    fn check_amount(amount: f64) -> Result<(), CoreError> {
        if amount <= 0.0 {
            return Err(CoreError::Validation(
                "amount must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
