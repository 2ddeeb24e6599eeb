//! Pay-cycle settings and recurring scheduled payments.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Identifiable, NamedEntity, TimeInterval};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates canonical income cadences.
pub enum PayFrequency {
    Weekly,
    Biweekly,
    FourWeekly,
    Monthly,
}

impl PayFrequency {
    /// The recurrence interval equivalent to one pay period.
    pub fn interval(self) -> TimeInterval {
        match self {
            PayFrequency::Weekly => TimeInterval::weeks(1),
            PayFrequency::Biweekly => TimeInterval::weeks(2),
            PayFrequency::FourWeekly => TimeInterval::weeks(4),
            PayFrequency::Monthly => TimeInterval::months(1),
        }
    }

    /// Nominal day-count of one pay period, for period-ratio math.
    pub fn approx_days(self) -> i64 {
        match self {
            PayFrequency::Weekly => 7,
            PayFrequency::Biweekly => 14,
            PayFrequency::FourWeekly => 28,
            PayFrequency::Monthly => 30,
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayFrequency::Weekly => "Weekly",
            PayFrequency::Biweekly => "Biweekly",
            PayFrequency::FourWeekly => "Every 4 Weeks",
            PayFrequency::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

/// Income settings driving all pay-day recurrence generation.
///
/// One instance per book. `next_pay_date` is preferred as the anchor when
/// known; `last_pay_date` and the monthly day-of-month anchor are fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaydaySettings {
    pub frequency: PayFrequency,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pay_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_pay_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_day_of_month: Option<u32>,
}

impl PaydaySettings {
    pub fn new(frequency: PayFrequency, amount: f64) -> Self {
        Self {
            frequency,
            amount,
            last_pay_date: None,
            next_pay_date: None,
            pay_day_of_month: None,
        }
    }

    pub fn with_next_pay_date(mut self, date: NaiveDate) -> Self {
        self.next_pay_date = Some(date);
        self
    }

    pub fn with_last_pay_date(mut self, date: NaiveDate) -> Self {
        self.last_pay_date = Some(date);
        self
    }

    pub fn on_day_of_month(mut self, day: u32) -> Self {
        self.pay_day_of_month = Some(day);
        self
    }
}

/// A recurring bill or reminder, optionally owned by an envelope.
///
/// `next_due_date` only ever advances after an occurrence is processed; past
/// occurrences are never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledPayment {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub amount: f64,
    pub interval: TimeInterval,
    pub next_due_date: NaiveDate,
    #[serde(default)]
    pub is_automatic: bool,
}

impl ScheduledPayment {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        interval: TimeInterval,
        next_due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            envelope_id: None,
            account_id: None,
            amount,
            interval,
            next_due_date,
            is_automatic: false,
        }
    }

    pub fn for_envelope(mut self, envelope_id: Uuid) -> Self {
        self.envelope_id = Some(envelope_id);
        self
    }

    pub fn from_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn automatic(mut self) -> Self {
        self.is_automatic = true;
        self
    }

    /// Moves `next_due_date` forward by one interval.
    pub fn advance(&mut self) {
        self.next_due_date = self.interval.next_date(self.next_due_date);
    }
}

impl Identifiable for ScheduledPayment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for ScheduledPayment {
    fn name(&self) -> &str {
        &self.name
    }
}
