//! Scheduled-payment lifecycle maintenance.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use flowcast_domain::{Book, ScheduledPayment};

use crate::recurrence_service::RecurrenceService;
use crate::CoreError;

/// Stateless helpers for registering and advancing scheduled payments.
/// Due dates only ever move forward; past occurrences are never rewritten.
pub struct PaymentService;

impl PaymentService {
    pub fn add(book: &mut Book, payment: ScheduledPayment) -> Result<Uuid, CoreError> {
        if book.payment(payment.id).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "scheduled payment {} already exists",
                payment.id
            )));
        }
        if payment.interval.every == 0 {
            return Err(CoreError::Validation(
                "recurrence interval must be at least one unit".into(),
            ));
        }
        if let Some(envelope_id) = payment.envelope_id {
            if book.envelope(envelope_id).is_none() {
                return Err(CoreError::EnvelopeNotFound(envelope_id));
            }
        }
        if let Some(account_id) = payment.account_id {
            if book.account(account_id).is_none() {
                return Err(CoreError::AccountNotFound(account_id));
            }
        }
        let id = payment.id;
        book.scheduled_payments.push(payment);
        Ok(id)
    }

    pub fn remove(book: &mut Book, id: Uuid) -> Result<ScheduledPayment, CoreError> {
        let position = book
            .scheduled_payments
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::PaymentNotFound(id))?;
        Ok(book.scheduled_payments.remove(position))
    }

    /// Records that the current occurrence was handled and advances the due
    /// date by one interval. Returns the new due date.
    pub fn mark_processed(book: &mut Book, id: Uuid) -> Result<NaiveDate, CoreError> {
        let payment = book.payment_mut(id).ok_or(CoreError::PaymentNotFound(id))?;
        payment.advance();
        debug!(payment = %id, next_due = %payment.next_due_date, "payment processed");
        Ok(payment.next_due_date)
    }

    /// Due occurrences of every payment within the window, ordered by date.
    pub fn upcoming(
        book: &Book,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<(Uuid, NaiveDate)>, CoreError> {
        let mut due = Vec::new();
        for payment in &book.scheduled_payments {
            for date in RecurrenceService::occurrences_between(
                payment.next_due_date,
                payment.interval,
                range_start,
                range_end,
            )? {
                due.push((payment.id, date));
            }
        }
        due.sort_by_key(|(id, date)| (*date, *id));
        Ok(due)
    }
}
