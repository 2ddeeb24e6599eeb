//! Forward simulation of pay days, bills, and cash-flow transfers.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::warn;
use uuid::Uuid;

use flowcast_domain::{
    AccountProjection, Book, Direction, Envelope, EnvelopeProjection, EventKind, FlowScope,
    PaydaySettings, ProjectionEvent, ProjectionResult, ProjectionTotals, ProjectionWarning,
    Scenario, TemporaryKind,
};

use crate::goal_service::GoalService;
use crate::payday_service::PaydayService;
use crate::recurrence_service::RecurrenceService;
use crate::{money, CoreError};

/// Name of the virtual bucket that groups envelopes with no linked account.
pub const UNASSIGNED_BUCKET: &str = "Unassigned";

/// Replays projected events against fresh balance maps and reports the end
/// state. Pure: every call owns its own working state and the book is never
/// mutated.
pub struct ProjectionService;

impl ProjectionService {
    /// Simulates the book forward from `today` (exclusive) through
    /// `target_date` (inclusive).
    pub fn project(
        book: &Book,
        scenario: Option<&Scenario>,
        today: NaiveDate,
        target_date: NaiveDate,
    ) -> Result<ProjectionResult, CoreError> {
        if target_date <= today {
            return Err(CoreError::Validation(
                "projection target date must be after the reference date".into(),
            ));
        }

        let range_start = today + Duration::days(1);
        let mut warnings = Vec::new();

        // Envelopes disabled by the scenario are excluded from simulation
        // entirely; balance overrides are folded into the working copies.
        let sim_envelopes: Vec<Envelope> = book
            .envelopes
            .iter()
            .filter(|envelope| {
                scenario
                    .map(|s| !s.excludes_envelope(envelope.id))
                    .unwrap_or(true)
            })
            .map(|envelope| {
                let mut copy = envelope.clone();
                if let Some(amount) = scenario
                    .and_then(|s| s.envelope_override(envelope.id))
                    .and_then(|o| o.starting_amount)
                {
                    copy.amount = amount;
                }
                copy
            })
            .collect();

        let settings = Self::effective_settings(book, scenario);
        let income_account = book
            .default_account()
            .or_else(|| book.accounts.first())
            .map(|account| account.id);

        let mut account_balances: HashMap<Uuid, f64> = book
            .accounts
            .iter()
            .map(|account| (account.id, account.balance))
            .collect();
        let mut envelope_balances: HashMap<Uuid, f64> = sim_envelopes
            .iter()
            .map(|envelope| (envelope.id, envelope.amount))
            .collect();

        // Which account bears each envelope's cash-flow debit, and how much
        // moves per pay day. Amounts not stored on the envelope are derived
        // from its goals.
        let mut cash_flow_source: HashMap<Uuid, Option<Uuid>> = HashMap::new();
        let mut cash_flow_amounts: HashMap<Uuid, f64> = HashMap::new();
        for envelope in &sim_envelopes {
            let link = match envelope.linked_account_id {
                Some(account_id) if book.account(account_id).is_none() => {
                    warn!(envelope = %envelope.id, account = %account_id, "envelope linked to unknown account");
                    warnings.push(ProjectionWarning::UnknownAccount {
                        reference: envelope.id,
                        account_id,
                    });
                    None
                }
                link => link,
            };
            cash_flow_source.insert(envelope.id, link.or(income_account));

            let envelope_override = scenario.and_then(|s| s.envelope_override(envelope.id));
            let enabled = envelope_override
                .and_then(|o| o.enabled)
                .unwrap_or(envelope.cash_flow_enabled);
            if !enabled {
                continue;
            }
            let amount = match envelope_override.and_then(|o| o.cash_flow_amount) {
                // An explicit override wins, even at zero.
                Some(amount) => amount,
                None => {
                    let mut amount = envelope.cash_flow_amount;
                    if amount <= 0.0 {
                        if let Some(settings) = &settings {
                            amount = GoalService::blend(
                                envelope,
                                book.payment_for_envelope(envelope.id),
                                settings,
                                today,
                            )?
                            .amount;
                        }
                    }
                    amount
                }
            };
            if amount > 0.0 {
                cash_flow_amounts.insert(envelope.id, amount);
            }
        }

        let events = Self::build_events(
            book,
            scenario,
            &sim_envelopes,
            settings.as_ref(),
            income_account,
            range_start,
            target_date,
            &mut warnings,
        )?;

        // Replay.
        let mut timeline: Vec<ProjectionEvent> = Vec::with_capacity(events.len());
        let mut reached: HashMap<Uuid, NaiveDate> = HashMap::new();
        let mut total_spent = 0.0;

        for envelope in &sim_envelopes {
            Self::record_crossing(envelope, envelope.amount, today, &mut reached);
        }

        for event in events {
            match event.kind {
                EventKind::PayDay | EventKind::TemporaryIncome => {
                    if let Some(account_id) = event.account_id {
                        if let Some(balance) = account_balances.get_mut(&account_id) {
                            *balance += event.amount;
                        }
                    }
                    let date = event.date;
                    timeline.push(event);
                    // Income replenishes the accounts; move each enabled
                    // envelope's contribution the same day.
                    for envelope in &sim_envelopes {
                        let Some(&amount) = cash_flow_amounts.get(&envelope.id) else {
                            continue;
                        };
                        let balance = envelope_balances
                            .get_mut(&envelope.id)
                            .expect("seeded envelope balance");
                        *balance += amount;
                        let crossed = *balance;
                        Self::record_crossing(envelope, crossed, date, &mut reached);
                        timeline.push(ProjectionEvent {
                            date,
                            kind: EventKind::CashFlow,
                            amount,
                            direction: Direction::Credit,
                            scope: FlowScope::Internal,
                            account_id: None,
                            envelope_id: Some(envelope.id),
                            label: format!("Cash flow: {}", envelope.name),
                        });
                        if let Some(source) = cash_flow_source
                            .get(&envelope.id)
                            .copied()
                            .flatten()
                        {
                            if let Some(balance) = account_balances.get_mut(&source) {
                                *balance -= amount;
                            }
                            timeline.push(ProjectionEvent {
                                date,
                                kind: EventKind::EnvelopeCashFlowWithdrawal,
                                amount,
                                direction: Direction::Debit,
                                scope: FlowScope::Internal,
                                account_id: Some(source),
                                envelope_id: None,
                                label: format!("Cash flow withdrawal: {}", envelope.name),
                            });
                        }
                    }
                }
                EventKind::ScheduledPayment | EventKind::TemporaryExpense => {
                    if let Some(envelope_id) = event.envelope_id {
                        if let Some(balance) = envelope_balances.get_mut(&envelope_id) {
                            *balance -= event.amount;
                        }
                    }
                    if let Some(account_id) = event.account_id {
                        if let Some(balance) = account_balances.get_mut(&account_id) {
                            *balance -= event.amount;
                        }
                    }
                    total_spent += event.amount;
                    timeline.push(event);
                }
                // Transfer pairs are generated during replay, never sourced.
                EventKind::CashFlow | EventKind::EnvelopeCashFlowWithdrawal => {}
            }
        }

        // Aggregate.
        let mut accounts = Vec::new();
        let mut totals = ProjectionTotals {
            available: 0.0,
            assigned: 0.0,
            spent: total_spent,
        };
        for account in &book.accounts {
            let envelopes: Vec<EnvelopeProjection> = sim_envelopes
                .iter()
                .filter(|e| e.linked_account_id == Some(account.id))
                .map(|e| Self::envelope_projection(e, &envelope_balances, &reached))
                .collect();
            let assigned: f64 = envelopes.iter().map(|e| e.final_amount).sum();
            let final_balance = account_balances
                .get(&account.id)
                .copied()
                .unwrap_or(account.balance);
            let available = final_balance - assigned;
            totals.available += available;
            totals.assigned += assigned;
            accounts.push(AccountProjection {
                account_id: Some(account.id),
                name: account.name.clone(),
                final_balance,
                assigned,
                available,
                envelopes,
            });
        }

        let orphaned: Vec<EnvelopeProjection> = sim_envelopes
            .iter()
            .filter(|e| match e.linked_account_id {
                None => true,
                Some(account_id) => book.account(account_id).is_none(),
            })
            .map(|e| Self::envelope_projection(e, &envelope_balances, &reached))
            .collect();
        if !orphaned.is_empty() {
            let assigned: f64 = orphaned.iter().map(|e| e.final_amount).sum();
            totals.assigned += assigned;
            accounts.push(AccountProjection {
                account_id: None,
                name: UNASSIGNED_BUCKET.into(),
                final_balance: assigned,
                assigned,
                // No account balance to measure against.
                available: 0.0,
                envelopes: orphaned,
            });
        }

        Ok(ProjectionResult {
            generated_through: target_date,
            accounts,
            timeline,
            totals,
            warnings,
        })
    }

    fn effective_settings(book: &Book, scenario: Option<&Scenario>) -> Option<PaydaySettings> {
        let mut settings = book.payday.clone()?;
        if let Some(scenario) = scenario {
            if let Some(amount) = scenario.pay_amount {
                settings.amount = amount;
            }
            if let Some(frequency) = scenario.pay_frequency {
                settings.frequency = frequency;
            }
        }
        Some(settings)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_events(
        book: &Book,
        scenario: Option<&Scenario>,
        sim_envelopes: &[Envelope],
        settings: Option<&PaydaySettings>,
        income_account: Option<Uuid>,
        range_start: NaiveDate,
        target_date: NaiveDate,
        warnings: &mut Vec<ProjectionWarning>,
    ) -> Result<Vec<ProjectionEvent>, CoreError> {
        let mut events = Vec::new();

        if let Some(settings) = settings {
            for date in PaydayService::pay_days_between(settings, range_start, target_date)? {
                events.push(ProjectionEvent {
                    date,
                    kind: EventKind::PayDay,
                    amount: settings.amount,
                    direction: Direction::Credit,
                    scope: FlowScope::External,
                    account_id: income_account,
                    envelope_id: None,
                    label: "Pay day".into(),
                });
            }
        }

        for payment in &book.scheduled_payments {
            let (envelope_id, account_id) = match payment.envelope_id {
                Some(envelope_id) => {
                    if book.envelope(envelope_id).is_none() {
                        warn!(payment = %payment.id, envelope = %envelope_id, "scheduled payment references unknown envelope");
                        warnings.push(ProjectionWarning::UnknownEnvelope {
                            reference: payment.id,
                            envelope_id,
                        });
                        continue;
                    }
                    let Some(envelope) = sim_envelopes.iter().find(|e| e.id == envelope_id)
                    else {
                        // Scenario-disabled envelope; its bills are out too.
                        continue;
                    };
                    let account_id = envelope
                        .linked_account_id
                        .filter(|id| book.account(*id).is_some());
                    (Some(envelope_id), account_id)
                }
                None => {
                    let account_id = match payment.account_id {
                        Some(account_id) if book.account(account_id).is_none() => {
                            warn!(payment = %payment.id, account = %account_id, "scheduled payment references unknown account");
                            warnings.push(ProjectionWarning::UnknownAccount {
                                reference: payment.id,
                                account_id,
                            });
                            continue;
                        }
                        Some(account_id) => Some(account_id),
                        None => income_account,
                    };
                    (None, account_id)
                }
            };

            // Scenario date overrides replace the payment's own recurrence.
            let override_dates = scenario.and_then(|s| s.payment_date_overrides.get(&payment.id));
            let dates = match override_dates {
                Some(dates) => {
                    let mut dates: Vec<NaiveDate> = dates
                        .iter()
                        .copied()
                        .filter(|d| *d >= range_start && *d <= target_date)
                        .collect();
                    dates.sort();
                    dates
                }
                None => RecurrenceService::occurrences_between(
                    payment.next_due_date,
                    payment.interval,
                    range_start,
                    target_date,
                )?,
            };
            for date in dates {
                events.push(ProjectionEvent {
                    date,
                    kind: EventKind::ScheduledPayment,
                    amount: payment.amount,
                    direction: Direction::Debit,
                    scope: FlowScope::External,
                    account_id,
                    envelope_id,
                    label: payment.name.clone(),
                });
            }
        }

        if let Some(scenario) = scenario {
            for item in &scenario.temporary_items {
                let envelope_id = match item.envelope_id {
                    Some(envelope_id) if book.envelope(envelope_id).is_none() => {
                        warn!(item = %item.id, envelope = %envelope_id, "temporary item references unknown envelope");
                        warnings.push(ProjectionWarning::UnknownEnvelope {
                            reference: item.id,
                            envelope_id,
                        });
                        continue;
                    }
                    Some(envelope_id)
                        if !sim_envelopes.iter().any(|e| e.id == envelope_id) =>
                    {
                        continue;
                    }
                    envelope_id => envelope_id,
                };
                let account_id = match item.account_id {
                    Some(account_id) if book.account(account_id).is_none() => {
                        warn!(item = %item.id, account = %account_id, "temporary item references unknown account");
                        warnings.push(ProjectionWarning::UnknownAccount {
                            reference: item.id,
                            account_id,
                        });
                        continue;
                    }
                    Some(account_id) => Some(account_id),
                    None => match envelope_id {
                        Some(envelope_id) => sim_envelopes
                            .iter()
                            .find(|e| e.id == envelope_id)
                            .and_then(|e| e.linked_account_id)
                            .filter(|id| book.account(*id).is_some()),
                        None => income_account,
                    },
                };
                let (kind, direction) = match item.kind {
                    TemporaryKind::Income => (EventKind::TemporaryIncome, Direction::Credit),
                    TemporaryKind::Expense => (EventKind::TemporaryExpense, Direction::Debit),
                };
                let dates = match item.recurrence {
                    Some(interval) => RecurrenceService::occurrences_between(
                        item.date,
                        interval,
                        range_start,
                        target_date,
                    )?,
                    None if item.date >= range_start && item.date <= target_date => {
                        vec![item.date]
                    }
                    None => Vec::new(),
                };
                for date in dates {
                    events.push(ProjectionEvent {
                        date,
                        kind,
                        amount: item.amount,
                        direction,
                        scope: FlowScope::External,
                        account_id,
                        envelope_id: match item.kind {
                            TemporaryKind::Expense => envelope_id,
                            TemporaryKind::Income => None,
                        },
                        label: item.name.clone(),
                    });
                }
            }
        }

        // Same-date ordering is deterministic: income first, then outflows,
        // then entity ids as a final tie-break.
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.kind.replay_priority().cmp(&b.kind.replay_priority()))
                .then_with(|| a.envelope_id.cmp(&b.envelope_id))
                .then_with(|| a.account_id.cmp(&b.account_id))
                .then_with(|| a.label.cmp(&b.label))
        });
        Ok(events)
    }

    fn envelope_projection(
        envelope: &Envelope,
        balances: &HashMap<Uuid, f64>,
        reached: &HashMap<Uuid, NaiveDate>,
    ) -> EnvelopeProjection {
        EnvelopeProjection {
            envelope_id: envelope.id,
            name: envelope.name.clone(),
            final_amount: balances.get(&envelope.id).copied().unwrap_or(envelope.amount),
            target_amount: envelope.target_amount,
            target_reached_on: reached.get(&envelope.id).copied(),
        }
    }

    /// First-crossing semantics: the earliest date the balance touches the
    /// target wins and is never overwritten.
    fn record_crossing(
        envelope: &Envelope,
        balance: f64,
        date: NaiveDate,
        reached: &mut HashMap<Uuid, NaiveDate>,
    ) {
        let Some(target) = envelope.target_amount else {
            return;
        };
        if balance + money::AMOUNT_EPSILON >= target {
            reached.entry(envelope.id).or_insert(date);
        }
    }
}
