use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flowcast_core::ProjectionService;
use flowcast_domain::{
    Account, AccountKind, Book, Envelope, PayFrequency, PaydaySettings, ScheduledPayment,
    TimeInterval,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_sample_book(envelope_count: usize) -> Book {
    let mut book = Book::new("Benchmark");
    let mut checking = Account::new("Checking", AccountKind::Checking).with_balance(10_000.0);
    checking.is_default = true;
    let checking_id = checking.id;
    book.accounts.push(checking);

    for idx in 0..envelope_count {
        let envelope = Envelope::new(format!("Envelope {idx}"))
            .with_amount((idx % 40) as f64 * 10.0)
            .linked_to(checking_id)
            .with_cash_flow(25.0 + (idx % 7) as f64);
        let envelope_id = envelope.id;
        book.envelopes.push(envelope);

        let due = date(2025, 1, 1 + (idx % 28) as u32);
        book.scheduled_payments.push(
            ScheduledPayment::new(
                format!("Bill {idx}"),
                40.0 + (idx % 11) as f64,
                TimeInterval::months(1),
                due,
            )
            .for_envelope(envelope_id)
            .automatic(),
        );
    }

    book.payday = Some(
        PaydaySettings::new(PayFrequency::Biweekly, 3200.0).with_next_pay_date(date(2025, 1, 10)),
    );
    book
}

fn bench_projection(c: &mut Criterion) {
    let book = build_sample_book(black_box(100));
    let today = date(2025, 1, 1);
    let target = date(2026, 1, 1);

    c.bench_function("project_100_envelopes_one_year", |b| {
        b.iter(|| {
            let result = ProjectionService::project(&book, None, today, target)
                .expect("projection");
            black_box(result);
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
