//! Envelope maintenance over book snapshots.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use flowcast_domain::{Book, Envelope};

use crate::{money, CoreError};

/// Stateless helpers enforcing envelope configuration rules: a target date
/// requires a target amount, and once the book has accounts every new
/// envelope must link to one.
pub struct EnvelopeService;

impl EnvelopeService {
    pub fn add(book: &mut Book, envelope: Envelope) -> Result<Uuid, CoreError> {
        if book.envelope(envelope.id).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "envelope {} already exists",
                envelope.id
            )));
        }
        Self::check_target(envelope.target_amount, envelope.target_date)?;
        match envelope.linked_account_id {
            Some(account_id) => {
                if book.account(account_id).is_none() {
                    return Err(CoreError::AccountNotFound(account_id));
                }
            }
            None => {
                if !book.accounts.is_empty() {
                    return Err(CoreError::Validation(
                        "envelope must link to an account".into(),
                    ));
                }
            }
        }
        let id = envelope.id;
        debug!(envelope = %id, name = %envelope.name, "envelope added");
        book.envelopes.push(envelope);
        Ok(id)
    }

    pub fn remove(book: &mut Book, id: Uuid) -> Result<Envelope, CoreError> {
        let position = book
            .envelopes
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::EnvelopeNotFound(id))?;
        book.scheduled_payments
            .retain(|p| p.envelope_id != Some(id));
        Ok(book.envelopes.remove(position))
    }

    pub fn rename(book: &mut Book, id: Uuid, name: impl Into<String>) -> Result<(), CoreError> {
        let envelope = book.envelope_mut(id).ok_or(CoreError::EnvelopeNotFound(id))?;
        envelope.name = name.into();
        Ok(())
    }

    pub fn set_target(
        book: &mut Book,
        id: Uuid,
        target_amount: Option<f64>,
        target_date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        Self::check_target(target_amount, target_date)?;
        let envelope = book.envelope_mut(id).ok_or(CoreError::EnvelopeNotFound(id))?;
        envelope.target_amount = target_amount;
        envelope.target_date = target_date;
        Ok(())
    }

    /// Updates cash-flow settings, suppressing sub-cent amount changes so a
    /// rederived recommendation does not churn stored state. Returns whether
    /// anything was stored.
    pub fn set_cash_flow(
        book: &mut Book,
        id: Uuid,
        enabled: bool,
        amount: f64,
    ) -> Result<bool, CoreError> {
        let envelope = book.envelope_mut(id).ok_or(CoreError::EnvelopeNotFound(id))?;
        let amount_changed = money::is_significant_change(envelope.cash_flow_amount, amount);
        if envelope.cash_flow_enabled == enabled && !amount_changed {
            return Ok(false);
        }
        envelope.cash_flow_enabled = enabled;
        if amount_changed {
            envelope.cash_flow_amount = money::round_cents(amount);
        }
        Ok(true)
    }

    fn check_target(
        target_amount: Option<f64>,
        target_date: Option<NaiveDate>,
    ) -> Result<(), CoreError> {
        if target_date.is_some() && target_amount.is_none() {
            return Err(CoreError::Validation(
                "target date requires a target amount".into(),
            ));
        }
        Ok(())
    }
}
