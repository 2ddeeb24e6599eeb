//! Blends a one-time savings goal and a recurring bill on one envelope.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use flowcast_domain::{
    AllocationPlan, BlendedCashFlow, CoverageOutlook, Envelope, PaydaySettings, ScheduledPayment,
};

use crate::allocation_service::AllocationService;
use crate::payday_service::PaydayService;
use crate::recurrence_service::RecurrenceService;
use crate::{money, CoreError};

/// Upper bound on the coverage simulation. Enough to distinguish "funded for
/// the coming year" from "funded forever".
pub const MAX_COVERAGE_CYCLES: u32 = 12;

/// Combines an envelope's savings target ("horizon") with its recurring bill
/// ("autopilot") into a single recommended cash-flow figure.
pub struct GoalService;

impl GoalService {
    pub fn blend(
        envelope: &Envelope,
        autopilot: Option<&ScheduledPayment>,
        settings: &PaydaySettings,
        today: NaiveDate,
    ) -> Result<BlendedCashFlow, CoreError> {
        let starting = envelope.amount;
        let next_pay = PaydayService::next_pay_day(settings, today)?;

        // Temporal allocation of the starting balance: a bill that lands
        // before the next pay day consumes the balance first, so the horizon
        // cannot claim the same money. A bill on the pay day itself counts as
        // payday-first and leaves the balance shared.
        let bill_before_payday = match (autopilot, next_pay) {
            (Some(bill), Some(pay)) => bill.next_due_date < pay,
            (Some(_), None) => true,
            _ => false,
        };

        let autopilot_plan = autopilot
            .map(|bill| {
                AllocationService::recommend(
                    starting,
                    bill.amount,
                    bill.next_due_date,
                    today,
                    settings,
                    bill.interval,
                )
            })
            .transpose()?;

        let horizon_plan = match (envelope.target_amount, envelope.target_date) {
            (Some(target), Some(date)) => {
                let horizon_start = if bill_before_payday { 0.0 } else { starting };
                let mut total = target;
                if let (Some(bill), Some(plan)) = (autopilot, autopilot_plan.as_ref()) {
                    // Bills falling before the horizon raise what must be
                    // saved, but only while the bill itself is unfunded;
                    // otherwise the same dollars would be demanded twice.
                    if plan.gap > 0.0 {
                        let occurrences = RecurrenceService::occurrences_between(
                            bill.next_due_date,
                            bill.interval,
                            today + Duration::days(1),
                            date,
                        )?;
                        total += occurrences.len() as f64 * bill.amount;
                    }
                }
                Some(Self::horizon_plan(horizon_start, total, date, today, settings)?)
            }
            // An undated target imposes no per-period requirement of its own.
            _ => None,
        };

        let coverage = match autopilot {
            Some(bill) if starting > bill.amount => {
                let ongoing = autopilot_plan.as_ref().map(|p| p.amount).unwrap_or(0.0);
                Some(Self::coverage(starting, bill, settings, ongoing))
            }
            _ => None,
        };

        let amount = money::round_cents(
            horizon_plan.map(|p| p.amount).unwrap_or(0.0)
                + autopilot_plan.map(|p| p.amount).unwrap_or(0.0),
        );
        debug!(
            envelope = %envelope.id,
            amount,
            bill_before_payday,
            "blended cash flow computed"
        );

        Ok(BlendedCashFlow {
            amount,
            horizon: horizon_plan,
            autopilot: autopilot_plan,
            coverage,
        })
    }

    /// One-time goal: the whole horizon is a single cycle, so the plan is a
    /// straight spread of the gap over the remaining pay periods.
    fn horizon_plan(
        starting: f64,
        target: f64,
        due_date: NaiveDate,
        today: NaiveDate,
        settings: &PaydaySettings,
    ) -> Result<AllocationPlan, CoreError> {
        let gap = target - starting;
        let periods_until_due = AllocationService::periods_until(settings, today, due_date)?;
        let amount = if gap <= 0.0 {
            0.0
        } else if periods_until_due == 0 {
            gap
        } else {
            gap / periods_until_due as f64
        };
        Ok(AllocationPlan {
            amount: money::round_cents(amount),
            is_steady_state: gap <= 0.0,
            periods_until_due,
            periods_per_cycle: periods_until_due.max(1),
            gap,
        })
    }

    /// Simulates forward, contributions first within each cycle, counting how
    /// many consecutive bill payments stay funded.
    fn coverage(
        starting: f64,
        bill: &ScheduledPayment,
        settings: &PaydaySettings,
        ongoing: f64,
    ) -> CoverageOutlook {
        let periods_per_cycle = AllocationService::periods_per_cycle(settings, bill.interval);
        let per_cycle_in = ongoing * periods_per_cycle as f64;
        let mut balance = starting;
        let mut cycles_covered = 0u32;
        while cycles_covered < MAX_COVERAGE_CYCLES {
            balance += per_cycle_in;
            if balance + money::AMOUNT_EPSILON < bill.amount {
                break;
            }
            balance -= bill.amount;
            cycles_covered += 1;
        }
        // Sub-cent shortfalls from rounding the per-period amount do not
        // count as running dry.
        let always_covered = cycles_covered == MAX_COVERAGE_CYCLES
            && per_cycle_in + money::SIGNIFICANT_CHANGE >= bill.amount;
        CoverageOutlook {
            cycles_covered,
            always_covered,
            suggested_amount: money::round_cents(bill.amount / periods_per_cycle as f64),
        }
    }
}
