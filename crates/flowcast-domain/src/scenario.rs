//! What-if override bundles applied on top of a book during projection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::TimeInterval;
use crate::schedule::PayFrequency;

/// Optional overrides layered over a book for a single projection run.
///
/// Overrides never mutate the underlying book; they are consumed by the
/// simulator and discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    #[serde(default)]
    pub envelope_overrides: BTreeMap<Uuid, EnvelopeOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_frequency: Option<PayFrequency>,
    /// Explicit occurrence dates that replace, not add to, the normal
    /// recurrence of the referenced scheduled payment.
    #[serde(default)]
    pub payment_date_overrides: BTreeMap<Uuid, Vec<NaiveDate>>,
    #[serde(default)]
    pub temporary_items: Vec<TemporaryItem>,
}

impl Scenario {
    pub fn envelope_override(&self, envelope_id: Uuid) -> Option<&EnvelopeOverride> {
        self.envelope_overrides.get(&envelope_id)
    }

    /// Whether the scenario removes the envelope from simulation entirely.
    pub fn excludes_envelope(&self, envelope_id: Uuid) -> bool {
        self.envelope_override(envelope_id)
            .and_then(|o| o.enabled)
            .map(|enabled| !enabled)
            .unwrap_or(false)
    }
}

/// Per-envelope scenario adjustments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_flow_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_amount: Option<f64>,
}

/// A one-time or recurring income/expense injected by a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporaryItem {
    pub id: Uuid,
    pub name: String,
    pub kind: TemporaryKind,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<TimeInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_id: Option<Uuid>,
}

impl TemporaryItem {
    pub fn income(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(name, TemporaryKind::Income, amount, date)
    }

    pub fn expense(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(name, TemporaryKind::Expense, amount, date)
    }

    fn new(name: impl Into<String>, kind: TemporaryKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            amount,
            date,
            recurrence: None,
            account_id: None,
            envelope_id: None,
        }
    }

    pub fn recurring(mut self, interval: TimeInterval) -> Self {
        self.recurrence = Some(interval);
        self
    }

    pub fn for_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn for_envelope(mut self, envelope_id: Uuid) -> Self {
        self.envelope_id = Some(envelope_id);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TemporaryKind {
    Income,
    Expense,
}
