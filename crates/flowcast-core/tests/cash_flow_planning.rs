use chrono::NaiveDate;

use flowcast_core::{AllocationService, GoalService, PaydayService, SplitService};
use flowcast_domain::{Envelope, PayFrequency, PaydaySettings, ScheduledPayment, TimeInterval};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn ten_biweekly_periods_spread_a_fresh_goal_evenly() {
    let today = date(2025, 1, 1);
    let settings =
        PaydaySettings::new(PayFrequency::Biweekly, 1000.0).with_next_pay_date(date(2025, 1, 15));
    // Due date lands exactly on the tenth pay day.
    let due = date(2025, 5, 21);
    let plan =
        AllocationService::recommend(0.0, 500.0, due, today, &settings, TimeInterval::years(1))
            .unwrap();
    assert_eq!(plan.periods_until_due, 10);
    assert_eq!(plan.amount, 50.0);
    assert!(!plan.is_steady_state);
}

#[test]
fn fully_funded_goal_recommends_the_maintenance_amount() {
    let today = date(2025, 1, 1);
    let settings =
        PaydaySettings::new(PayFrequency::Biweekly, 1000.0).with_next_pay_date(date(2025, 1, 15));
    let plan = AllocationService::recommend(
        500.0,
        500.0,
        date(2025, 9, 1),
        today,
        &settings,
        TimeInterval::months(1),
    )
    .unwrap();
    assert_eq!(plan.amount, 166.67);
    assert_eq!(plan.periods_per_cycle, 3);
}

#[test]
fn yesterdays_bill_demands_the_whole_gap_at_once() {
    let today = date(2025, 4, 10);
    let settings =
        PaydaySettings::new(PayFrequency::Weekly, 600.0).with_next_pay_date(date(2025, 4, 11));
    let plan = AllocationService::recommend(
        150.0,
        400.0,
        date(2025, 4, 9),
        today,
        &settings,
        TimeInterval::months(1),
    )
    .unwrap();
    assert_eq!(plan.periods_until_due, 0);
    assert_eq!(plan.amount, 250.0);
}

#[test]
fn monthly_pay_on_the_thirty_first_survives_short_months() {
    let settings = PaydaySettings::new(PayFrequency::Monthly, 3000.0)
        .with_next_pay_date(date(2025, 3, 31))
        .on_day_of_month(31);
    let pay_days =
        PaydayService::pay_days_between(&settings, date(2025, 4, 1), date(2025, 7, 31)).unwrap();
    // April clamps to the 30th, June to the 30th, May and July return to 31.
    assert_eq!(
        pay_days,
        vec![
            date(2025, 4, 30),
            date(2025, 5, 31),
            date(2025, 6, 30),
            date(2025, 7, 31),
        ]
    );
}

#[test]
fn sixty_percent_edit_rebalances_the_remaining_envelopes() {
    use std::collections::BTreeMap;
    use uuid::Uuid;

    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let mut split: BTreeMap<Uuid, f64> = BTreeMap::new();
    split.insert(ids[0], 40.0);
    split.insert(ids[1], 30.0);
    split.insert(ids[2], 30.0);

    let updated = SplitService::update_allocation(&split, ids[0], 60.0).unwrap();
    assert!((updated[&ids[0]] - 60.0).abs() < 1e-6);
    assert!((updated[&ids[1]] - 20.0).abs() < 1e-6);
    assert!((updated[&ids[2]] - 20.0).abs() < 1e-6);
    let total: f64 = updated.values().sum();
    assert!((total - 100.0).abs() < 1e-6);
}

#[test]
fn blended_goal_and_bill_requirement_adds_up() {
    let today = date(2025, 1, 1);
    let settings =
        PaydaySettings::new(PayFrequency::Biweekly, 1500.0).with_next_pay_date(date(2025, 1, 15));
    let envelope = Envelope::new("Home")
        .with_amount(0.0)
        .with_target(1000.0, Some(date(2025, 5, 21)));
    let bill = ScheduledPayment::new("HOA", 150.0, TimeInterval::months(1), date(2025, 1, 20))
        .for_envelope(envelope.id)
        .automatic();

    let blend = GoalService::blend(&envelope, Some(&bill), &settings, today).unwrap();
    let horizon = blend.horizon.expect("horizon plan");
    let autopilot = blend.autopilot.expect("autopilot plan");

    // Five HOA payments (Jan 20 .. May 20) fall before the horizon date and
    // the bill is unfunded, so they inflate the horizon requirement.
    assert_eq!(horizon.gap, 1000.0 + 5.0 * 150.0);
    assert_eq!(horizon.periods_until_due, 10);
    assert!(autopilot.amount > 0.0);
    assert!((blend.amount - (horizon.amount + autopilot.amount)).abs() < 1e-9);
}

#[test]
fn steady_state_blend_does_not_oscillate() {
    let today = date(2025, 1, 1);
    let settings =
        PaydaySettings::new(PayFrequency::Biweekly, 1500.0).with_next_pay_date(date(2025, 1, 15));
    let envelope = Envelope::new("Utilities").with_amount(120.0);
    let bill = ScheduledPayment::new("Power", 120.0, TimeInterval::months(1), date(2025, 3, 1))
        .for_envelope(envelope.id)
        .automatic();

    let first = GoalService::blend(&envelope, Some(&bill), &settings, today).unwrap();
    for _ in 0..4 {
        let again = GoalService::blend(&envelope, Some(&bill), &settings, today).unwrap();
        assert_eq!(again, first);
    }
}
