//! The gap / steady-state contribution model.

use chrono::{Duration, NaiveDate};

use flowcast_domain::{AllocationPlan, PaydaySettings, TimeInterval};

use crate::payday_service::PaydayService;
use crate::{money, CoreError};

/// Derives the per-pay-period contribution needed to fund a target by its
/// due date, distinguishing catch-up from a sustainable steady state.
pub struct AllocationService;

impl AllocationService {
    /// Recommends a contribution for a goal of `target` due on `due_date`,
    /// given the current `starting` balance and the bill's own recurrence
    /// interval.
    ///
    /// Policy, in priority order: an already-covered gap keeps the
    /// maintenance rhythm (`target / periods_per_cycle`, not zero); an
    /// overdue bill takes the whole gap as a lump; enough periods before the
    /// next cycle means the sustainable steady amount; anything else spreads
    /// the gap over the remaining periods.
    pub fn recommend(
        starting: f64,
        target: f64,
        due_date: NaiveDate,
        today: NaiveDate,
        settings: &PaydaySettings,
        bill_interval: TimeInterval,
    ) -> Result<AllocationPlan, CoreError> {
        let gap = target - starting;
        let periods_until_due = Self::periods_until(settings, today, due_date)?;
        let periods_per_cycle = Self::periods_per_cycle(settings, bill_interval);

        let (amount, is_steady_state) = if gap <= 0.0 {
            (target / periods_per_cycle as f64, true)
        } else if periods_until_due == 0 {
            (gap, false)
        } else if periods_until_due >= periods_per_cycle {
            (target / periods_per_cycle as f64, true)
        } else {
            (gap / periods_until_due as f64, false)
        };

        Ok(AllocationPlan {
            amount: money::round_cents(amount),
            is_steady_state,
            periods_until_due,
            periods_per_cycle,
            gap,
        })
    }

    /// Number of pay days strictly after `today`, up to and including `due`.
    pub fn periods_until(
        settings: &PaydaySettings,
        today: NaiveDate,
        due: NaiveDate,
    ) -> Result<u32, CoreError> {
        if due <= today {
            return Ok(0);
        }
        let pay_days = PaydayService::pay_days_between(settings, today + Duration::days(1), due)?;
        Ok(pay_days.len() as u32)
    }

    /// Pay periods that recur per one bill cycle, defining the sustainable
    /// steady-state contribution. Always at least one.
    pub fn periods_per_cycle(settings: &PaydaySettings, bill_interval: TimeInterval) -> u32 {
        let bill_days = bill_interval.approx_days().max(1);
        let pay_days = settings.frequency.approx_days().max(1);
        (bill_days + pay_days - 1).div_euclid(pay_days).max(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use flowcast_domain::PayFrequency;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn biweekly_from(next_pay: NaiveDate) -> PaydaySettings {
        PaydaySettings::new(PayFrequency::Biweekly, 1000.0).with_next_pay_date(next_pay)
    }

    #[test]
    fn catch_up_spreads_gap_over_remaining_periods() {
        let today = date(2025, 1, 1);
        let settings = biweekly_from(date(2025, 1, 15));
        // Ten biweekly pay days land before the due date.
        let due = date(2025, 5, 28);
        let plan = AllocationService::recommend(
            0.0,
            500.0,
            due,
            today,
            &settings,
            TimeInterval::years(1),
        )
        .unwrap();
        assert_eq!(plan.periods_until_due, 10);
        assert_eq!(plan.amount, 50.0);
        assert!(!plan.is_steady_state);
    }

    #[test]
    fn covered_gap_keeps_maintenance_rhythm() {
        let today = date(2025, 1, 1);
        let settings = biweekly_from(date(2025, 1, 15));
        let plan = AllocationService::recommend(
            500.0,
            500.0,
            date(2025, 6, 1),
            today,
            &settings,
            TimeInterval::months(1),
        )
        .unwrap();
        assert!(plan.gap <= 0.0);
        assert_eq!(plan.periods_per_cycle, 3);
        assert_eq!(plan.amount, money::round_cents(500.0 / 3.0));
        assert!(plan.is_steady_state);
    }

    #[test]
    fn overdue_bill_takes_full_gap_as_lump() {
        let today = date(2025, 3, 10);
        let settings = biweekly_from(date(2025, 3, 14));
        let plan = AllocationService::recommend(
            120.0,
            500.0,
            date(2025, 3, 9),
            today,
            &settings,
            TimeInterval::months(1),
        )
        .unwrap();
        assert_eq!(plan.periods_until_due, 0);
        assert_eq!(plan.amount, 380.0);
        assert!(!plan.is_steady_state);
    }

    #[test]
    fn steady_state_uses_sustainable_amount() {
        let today = date(2025, 1, 1);
        let settings = biweekly_from(date(2025, 1, 15));
        // Monthly bill, biweekly pay: ceil(30 / 14) = 3 periods per cycle.
        let plan = AllocationService::recommend(
            0.0,
            300.0,
            date(2025, 3, 1),
            today,
            &settings,
            TimeInterval::months(1),
        )
        .unwrap();
        assert_eq!(plan.periods_per_cycle, 3);
        assert!(plan.periods_until_due >= plan.periods_per_cycle);
        assert_eq!(plan.amount, 100.0);
        assert!(plan.is_steady_state);
    }

    #[test]
    fn more_periods_never_raise_the_catch_up_amount() {
        let today = date(2025, 1, 1);
        let settings = biweekly_from(date(2025, 1, 15));
        let mut last = f64::MAX;
        // Walk the due date outward one pay period at a time with gap fixed
        // at the full target.
        for periods in 1..12u32 {
            let due = date(2025, 1, 1) + Duration::days(14 * periods as i64 + 1);
            let plan = AllocationService::recommend(
                0.0,
                500.0,
                due,
                today,
                &settings,
                TimeInterval::years(1),
            )
            .unwrap();
            assert!(plan.amount <= last + money::AMOUNT_EPSILON);
            last = plan.amount;
        }
    }

    #[test]
    fn steady_state_recalculation_is_stable() {
        let today = date(2025, 1, 1);
        let settings = biweekly_from(date(2025, 1, 15));
        let first = AllocationService::recommend(
            40.0,
            300.0,
            date(2025, 6, 1),
            today,
            &settings,
            TimeInterval::months(1),
        )
        .unwrap();
        assert!(first.is_steady_state);
        for _ in 0..5 {
            let again = AllocationService::recommend(
                40.0,
                300.0,
                date(2025, 6, 1),
                today,
                &settings,
                TimeInterval::months(1),
            )
            .unwrap();
            assert_eq!(again, first);
        }
    }
}
