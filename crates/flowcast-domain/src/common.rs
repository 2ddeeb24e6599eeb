//! Shared traits and calendar primitives for budgeting entities.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in a book.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates time units used by [`TimeInterval`].
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Represents a time unit and multiplier for recurrence calculations.
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub fn new(every: u32, unit: TimeUnit) -> Self {
        Self { every, unit }
    }

    pub fn days(every: u32) -> Self {
        Self::new(every, TimeUnit::Day)
    }

    pub fn weeks(every: u32) -> Self {
        Self::new(every, TimeUnit::Week)
    }

    pub fn months(every: u32) -> Self {
        Self::new(every, TimeUnit::Month)
    }

    pub fn years(every: u32) -> Self {
        Self::new(every, TimeUnit::Year)
    }

    /// Calculates the next date after `from` according to the interval.
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self.unit {
            TimeUnit::Day => from + Duration::days(self.every as i64),
            TimeUnit::Week => from + Duration::weeks(self.every as i64),
            TimeUnit::Month => shift_month(from, self.every as i32),
            TimeUnit::Year => shift_year(from, self.every as i32),
        }
    }

    /// Calculates occurrence `steps` counted from `anchor`.
    ///
    /// Month and year steps are measured from the anchor itself so that an
    /// anchor on the 31st clamps to short months and returns to the 31st in
    /// longer ones, instead of drifting to whichever day the previous
    /// occurrence was clamped to.
    pub fn date_at(&self, anchor: NaiveDate, steps: u32) -> NaiveDate {
        let span = (self.every as i64) * (steps as i64);
        match self.unit {
            TimeUnit::Day => anchor + Duration::days(span),
            TimeUnit::Week => anchor + Duration::weeks(span),
            TimeUnit::Month => shift_month(anchor, span as i32),
            TimeUnit::Year => shift_year(anchor, span as i32),
        }
    }

    /// Returns the nominal day-count of one interval, for period-ratio math.
    pub fn approx_days(&self) -> i64 {
        let unit_days = match self.unit {
            TimeUnit::Day => 1,
            TimeUnit::Week => 7,
            TimeUnit::Month => 30,
            TimeUnit::Year => 365,
        };
        unit_days * self.every as i64
    }

    pub fn label(&self) -> String {
        match (self.every, self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}{}", n, unit, if n > 1 { "s" } else { "" }),
        }
    }
}

/// Shifts a date by whole calendar months, clamping the day to the target
/// month's actual last day (Jan 31 + 1 month is Feb 28 or 29).
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day_clamped(year, month as u32, date.day())
}

/// Shifts a date by whole calendar years with the same day clamping.
pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    day_clamped(date.year() + years, date.month(), date.day())
}

/// Builds a date from year/month and a requested day, clamping the day to the
/// month's actual length. Never panics on short months.
pub fn day_clamped(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.max(1).min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is always valid")
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).expect("day 28 exists"));
    (first_next - Duration::days(1)).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_addition_clamps_to_short_months() {
        let jan = date(2025, 1, 31);
        assert_eq!(TimeInterval::months(1).next_date(jan), date(2025, 2, 28));
        assert_eq!(shift_month(jan, 1), date(2025, 2, 28));
        // Leap year keeps the 29th.
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
    }

    #[test]
    fn date_at_measures_from_the_anchor() {
        let jan = date(2025, 1, 31);
        let monthly = TimeInterval::months(1);
        assert_eq!(monthly.date_at(jan, 1), date(2025, 2, 28));
        // Stepping from the anchor restores the 31st in March.
        assert_eq!(monthly.date_at(jan, 2), date(2025, 3, 31));
        assert_eq!(monthly.date_at(jan, 3), date(2025, 4, 30));
    }

    #[test]
    fn flat_units_use_duration_addition() {
        let start = date(2025, 1, 1);
        assert_eq!(TimeInterval::days(3).next_date(start), date(2025, 1, 4));
        assert_eq!(TimeInterval::weeks(2).next_date(start), date(2025, 1, 15));
        assert_eq!(TimeInterval::weeks(2).date_at(start, 3), date(2025, 2, 12));
    }

    #[test]
    fn days_in_month_handles_february() {
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn label_generation() {
        assert_eq!(TimeInterval::months(1).label(), "Monthly");
        assert_eq!(TimeInterval::weeks(2).label(), "Every 2 Weeks");
    }
}
