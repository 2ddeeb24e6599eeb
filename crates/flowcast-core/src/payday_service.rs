//! Pay-day sequence generation from income settings.

use chrono::{Datelike, Duration, NaiveDate};

use flowcast_domain::{day_clamped, shift_month, PayFrequency, PaydaySettings};

use crate::recurrence_service::MAX_OCCURRENCES;
use crate::CoreError;

/// Specializes recurrence math for income events, resolving ambiguous
/// reference points and guaranteeing forward progress.
pub struct PaydayService;

impl PaydayService {
    /// Returns every pay day within `[range_start, range_end]`, strictly
    /// increasing, never outside the range.
    ///
    /// Anchor resolution order: a usable `next_pay_date`, a stale
    /// `next_pay_date` rolled forward, `last_pay_date` plus one frequency
    /// step rolled forward, and finally the first occurrence at or after
    /// `range_start` within the current period.
    pub fn pay_days_between(
        settings: &PaydaySettings,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CoreError> {
        if range_end < range_start {
            return Ok(Vec::new());
        }
        let anchor = Self::resolve_anchor(settings, range_start)?;
        let mut pay_days = Vec::new();
        match settings.frequency {
            PayFrequency::Monthly => {
                // Keep the day-of-month anchor stable across months so a payday
                // on the 31st clamps to the 30th or 28th and comes back.
                let day = settings.pay_day_of_month.unwrap_or_else(|| anchor.day());
                let first = day_clamped(anchor.year(), anchor.month(), day);
                for months in 0..MAX_OCCURRENCES as i32 {
                    let base = shift_month(first, months);
                    let date = day_clamped(base.year(), base.month(), day);
                    if date > range_end {
                        break;
                    }
                    if date >= range_start {
                        pay_days.push(date);
                    }
                }
            }
            frequency => {
                let interval = frequency.interval();
                for step in 0..MAX_OCCURRENCES as u32 {
                    let date = interval.date_at(anchor, step);
                    if date > range_end {
                        break;
                    }
                    if date >= range_start {
                        pay_days.push(date);
                    }
                }
            }
        }
        Ok(pay_days)
    }

    /// First pay day strictly after `today`, if one exists in the next two
    /// years.
    pub fn next_pay_day(
        settings: &PaydaySettings,
        today: NaiveDate,
    ) -> Result<Option<NaiveDate>, CoreError> {
        let horizon = today + Duration::days(731);
        Ok(
            Self::pay_days_between(settings, today + Duration::days(1), horizon)?
                .into_iter()
                .next(),
        )
    }

    fn resolve_anchor(
        settings: &PaydaySettings,
        range_start: NaiveDate,
    ) -> Result<NaiveDate, CoreError> {
        if let Some(next) = settings.next_pay_date {
            if next >= range_start {
                return Ok(next);
            }
            return Self::roll_forward(settings, next, range_start);
        }
        if let Some(last) = settings.last_pay_date {
            let candidate = Self::one_step(settings, last);
            if candidate >= range_start {
                return Ok(candidate);
            }
            return Self::roll_forward(settings, candidate, range_start);
        }
        // No reference at all: first occurrence at or after range_start
        // within the current period.
        match settings.frequency {
            PayFrequency::Monthly => {
                let day = settings.pay_day_of_month.unwrap_or(1);
                let candidate = day_clamped(range_start.year(), range_start.month(), day);
                if candidate >= range_start {
                    Ok(candidate)
                } else {
                    let next_month = shift_month(candidate.with_day(1).expect("day 1"), 1);
                    Ok(day_clamped(next_month.year(), next_month.month(), day))
                }
            }
            _ => Ok(range_start),
        }
    }

    fn one_step(settings: &PaydaySettings, from: NaiveDate) -> NaiveDate {
        match settings.frequency {
            PayFrequency::Monthly => {
                let shifted = shift_month(from, 1);
                let day = settings.pay_day_of_month.unwrap_or_else(|| from.day());
                day_clamped(shifted.year(), shifted.month(), day)
            }
            frequency => frequency.interval().next_date(from),
        }
    }

    fn roll_forward(
        settings: &PaydaySettings,
        stale: NaiveDate,
        range_start: NaiveDate,
    ) -> Result<NaiveDate, CoreError> {
        let mut candidate = stale;
        for _ in 0..MAX_OCCURRENCES {
            if candidate >= range_start {
                return Ok(candidate);
            }
            candidate = Self::one_step(settings, candidate);
        }
        Err(CoreError::InvalidOperation(format!(
            "pay-day anchor {stale} cannot reach {range_start}"
        )))
    }
}
