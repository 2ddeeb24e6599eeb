use chrono::NaiveDate;
use serde_json::Value;

use flowcast_domain::{
    Account, AccountKind, Book, Envelope, PayFrequency, PaydaySettings, Scenario,
    ScheduledPayment, TemporaryItem, TimeInterval,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_book() -> Book {
    let mut book = Book::new("Snapshot");
    let mut checking = Account::new("Checking", AccountKind::Checking).with_balance(1500.0);
    checking.is_default = true;
    let checking_id = checking.id;
    book.accounts.push(checking);

    let rent = Envelope::new("Rent")
        .with_amount(450.0)
        .with_target(900.0, Some(date(2025, 6, 1)))
        .linked_to(checking_id)
        .with_cash_flow(225.0);
    let rent_id = rent.id;
    book.envelopes.push(rent);

    book.scheduled_payments.push(
        ScheduledPayment::new("Rent", 900.0, TimeInterval::months(1), date(2025, 2, 1))
            .for_envelope(rent_id)
            .automatic(),
    );
    book.payday = Some(
        PaydaySettings::new(PayFrequency::Biweekly, 1600.0)
            .with_last_pay_date(date(2025, 1, 3))
            .with_next_pay_date(date(2025, 1, 17)),
    );
    book
}

#[test]
fn book_serialization_round_trips() {
    let book = sample_book();
    let json = serde_json::to_string(&book).unwrap();
    let loaded: Book = serde_json::from_str(&json).unwrap();

    let original: Value = serde_json::to_value(&book).unwrap();
    let round_tripped: Value = serde_json::to_value(&loaded).unwrap();
    assert_eq!(original, round_tripped);
    assert_eq!(book, loaded);
}

#[test]
fn scenario_serialization_round_trips() {
    let book = sample_book();
    let mut scenario = Scenario::default();
    scenario.pay_amount = Some(1800.0);
    scenario.pay_frequency = Some(PayFrequency::Monthly);
    scenario.payment_date_overrides.insert(
        book.scheduled_payments[0].id,
        vec![date(2025, 2, 14)],
    );
    scenario.temporary_items.push(
        TemporaryItem::expense("Tyres", 380.0, date(2025, 3, 3))
            .for_account(book.accounts[0].id),
    );
    scenario.temporary_items.push(
        TemporaryItem::income("Bonus", 500.0, date(2025, 2, 20))
            .recurring(TimeInterval::months(3)),
    );

    let json = serde_json::to_string(&scenario).unwrap();
    let loaded: Scenario = serde_json::from_str(&json).unwrap();
    assert_eq!(scenario, loaded);
}

#[test]
fn book_accessors_resolve_entities() {
    let book = sample_book();
    let account_id = book.accounts[0].id;
    let envelope_id = book.envelopes[0].id;

    assert_eq!(book.default_account().map(|a| a.id), Some(account_id));
    assert_eq!(book.envelope(envelope_id).map(|e| e.name.as_str()), Some("Rent"));
    assert_eq!(
        book.payment_for_envelope(envelope_id).map(|p| p.amount),
        Some(900.0)
    );
    assert_eq!(book.assigned_to(account_id), 450.0);
    assert_eq!(book.available_in(account_id), Some(1050.0));
}

#[test]
fn envelope_target_helpers() {
    let envelope = Envelope::new("Trip").with_amount(200.0).with_target(500.0, None);
    assert!(envelope.has_unmet_target());
    let funded = Envelope::new("Trip").with_amount(600.0).with_target(500.0, None);
    assert!(!funded.has_unmet_target());
    assert!(!Envelope::new("Plain").has_unmet_target());
}
