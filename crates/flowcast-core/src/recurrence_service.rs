//! Occurrence generation for arbitrary recurrence frequencies.

use chrono::NaiveDate;

use flowcast_domain::TimeInterval;

use crate::CoreError;

/// Hard cap on generated occurrences per sequence. Misconfigured frequencies
/// must never turn a projection into an unbounded loop.
pub const MAX_OCCURRENCES: usize = 1000;

/// Pure date-sequence math for recurring payments and incomes.
pub struct RecurrenceService;

impl RecurrenceService {
    /// Returns every occurrence of `interval`, anchored at `anchor`, that
    /// falls within `[range_start, range_end]`, in strictly increasing order.
    ///
    /// Day and week units use flat duration addition; month and year units
    /// use calendar-field addition measured from the anchor, clamping the day
    /// to each target month's actual last day. An anchor already past
    /// `range_end` yields an empty sequence.
    pub fn occurrences_between(
        anchor: NaiveDate,
        interval: TimeInterval,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CoreError> {
        if interval.every == 0 {
            return Err(CoreError::Validation(
                "recurrence interval must be at least one unit".into(),
            ));
        }

        let mut occurrences = Vec::new();
        if anchor > range_end || range_end < range_start {
            return Ok(occurrences);
        }

        for step in 0..MAX_OCCURRENCES as u32 {
            let date = interval.date_at(anchor, step);
            if date > range_end {
                break;
            }
            if date >= range_start {
                occurrences.push(date);
            }
        }
        Ok(occurrences)
    }
}
