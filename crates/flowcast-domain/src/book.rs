//! The top-level snapshot aggregate handed to core services.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::Account;
use crate::envelope::Envelope;
use crate::projection::Direction;
use crate::schedule::{PaydaySettings, ScheduledPayment};

/// One user's complete budgeting state: accounts, envelopes, scheduled
/// payments, and pay-day settings. Plain data; all invariants are enforced by
/// the services that mutate it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub envelopes: Vec<Envelope>,
    #[serde(default)]
    pub scheduled_payments: Vec<ScheduledPayment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payday: Option<PaydaySettings>,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: Vec::new(),
            envelopes: Vec::new(),
            scheduled_payments: Vec::new(),
            payday: None,
        }
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: Uuid) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn default_account(&self) -> Option<&Account> {
        self.accounts.iter().find(|a| a.is_default)
    }

    pub fn envelope(&self, id: Uuid) -> Option<&Envelope> {
        self.envelopes.iter().find(|e| e.id == id)
    }

    pub fn envelope_mut(&mut self, id: Uuid) -> Option<&mut Envelope> {
        self.envelopes.iter_mut().find(|e| e.id == id)
    }

    pub fn payment(&self, id: Uuid) -> Option<&ScheduledPayment> {
        self.scheduled_payments.iter().find(|p| p.id == id)
    }

    pub fn payment_mut(&mut self, id: Uuid) -> Option<&mut ScheduledPayment> {
        self.scheduled_payments.iter_mut().find(|p| p.id == id)
    }

    /// Scheduled payment owned by the given envelope, if any.
    pub fn payment_for_envelope(&self, envelope_id: Uuid) -> Option<&ScheduledPayment> {
        self.scheduled_payments
            .iter()
            .find(|p| p.envelope_id == Some(envelope_id))
    }

    /// Sum of balances of envelopes linked to the account.
    pub fn assigned_to(&self, account_id: Uuid) -> f64 {
        self.envelopes
            .iter()
            .filter(|e| e.linked_account_id == Some(account_id))
            .map(|e| e.amount)
            .sum()
    }

    /// Account balance not yet claimed by any envelope.
    pub fn available_in(&self, account_id: Uuid) -> Option<f64> {
        self.account(account_id)
            .map(|a| a.balance - self.assigned_to(account_id))
    }
}

/// Audit record produced for every balance mutation. Transfers yield a
/// matched debit/credit pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_id: Option<Uuid>,
    pub amount: f64,
    pub direction: Direction,
    pub memo: String,
}

impl EntryRecord {
    pub fn account_entry(
        date: NaiveDate,
        account_id: Uuid,
        amount: f64,
        direction: Direction,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            account_id: Some(account_id),
            envelope_id: None,
            amount,
            direction,
            memo: memo.into(),
        }
    }

    pub fn envelope_entry(
        date: NaiveDate,
        envelope_id: Uuid,
        amount: f64,
        direction: Direction,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            account_id: None,
            envelope_id: Some(envelope_id),
            amount,
            direction,
            memo: memo.into(),
        }
    }
}
