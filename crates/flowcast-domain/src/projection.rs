//! Value objects produced by projection and allocation runs.
//!
//! Everything here is generated fresh per computation and never persisted or
//! mutated in place.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Tags every simulated timeline entry with its origin.
pub enum EventKind {
    PayDay,
    ScheduledPayment,
    TemporaryIncome,
    TemporaryExpense,
    CashFlow,
    EnvelopeCashFlowWithdrawal,
}

impl EventKind {
    /// Same-date ordering: income lands before internal transfers, which land
    /// before outflows, so a pay day received on a bill's due date funds the
    /// bill rather than arriving after it.
    pub fn replay_priority(self) -> u8 {
        match self {
            EventKind::PayDay => 0,
            EventKind::TemporaryIncome => 1,
            EventKind::CashFlow => 2,
            EventKind::EnvelopeCashFlowWithdrawal => 3,
            EventKind::ScheduledPayment => 4,
            EventKind::TemporaryExpense => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Whether money crosses the modeled system's boundary.
///
/// External flows count toward "total spent" (the money left the system);
/// internal flows only move value between modeled entities.
pub enum FlowScope {
    Internal,
    External,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

/// A single entry in the simulated timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub amount: f64,
    pub direction: Direction,
    pub scope: FlowScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_id: Option<Uuid>,
    pub label: String,
}

/// Projected end state of one envelope, with first-crossing target metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeProjection {
    pub envelope_id: Uuid,
    pub name: String,
    pub final_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    /// First date the projected balance reached the target. Never moved once
    /// recorded, even if later events drop the balance back below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reached_on: Option<NaiveDate>,
}

/// Projected end state of one account and the envelopes it backs.
///
/// `account_id` is `None` for the virtual bucket that holds envelopes with no
/// linked account; its `available` is fixed at zero because there is no
/// account balance to measure against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountProjection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub name: String,
    pub final_balance: f64,
    pub assigned: f64,
    pub available: f64,
    pub envelopes: Vec<EnvelopeProjection>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectionTotals {
    pub available: f64,
    pub assigned: f64,
    pub spent: f64,
}

/// Referential anomalies observed while building the timeline.
///
/// The affected entries are skipped for computation but surfaced here instead
/// of being dropped silently, so data-integrity problems stay visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectionWarning {
    UnknownEnvelope { reference: Uuid, envelope_id: Uuid },
    UnknownAccount { reference: Uuid, account_id: Uuid },
}

impl fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionWarning::UnknownEnvelope {
                reference,
                envelope_id,
            } => write!(f, "{reference} references unknown envelope {envelope_id}"),
            ProjectionWarning::UnknownAccount {
                reference,
                account_id,
            } => write!(f, "{reference} references unknown account {account_id}"),
        }
    }
}

/// Complete output of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionResult {
    pub generated_through: NaiveDate,
    pub accounts: Vec<AccountProjection>,
    pub timeline: Vec<ProjectionEvent>,
    pub totals: ProjectionTotals,
    #[serde(default)]
    pub warnings: Vec<ProjectionWarning>,
}

/// Recommended per-pay-period contribution for a single goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AllocationPlan {
    pub amount: f64,
    pub is_steady_state: bool,
    pub periods_until_due: u32,
    pub periods_per_cycle: u32,
    pub gap: f64,
}

/// How long the current balance plus ongoing contributions keep a recurring
/// bill funded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoverageOutlook {
    pub cycles_covered: u32,
    pub always_covered: bool,
    /// Steady-state per-pay-period amount that would sustain the bill.
    pub suggested_amount: f64,
}

/// Combined recommendation for an envelope carrying both a savings goal and a
/// recurring bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlendedCashFlow {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<AllocationPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autopilot: Option<AllocationPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageOutlook>,
}
