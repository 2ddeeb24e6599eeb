use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Identifiable, NamedEntity};

/// A named sub-allocation of money with its own balance, optional savings
/// target, and optional recurring contribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub cash_flow_enabled: bool,
    #[serde(default)]
    pub cash_flow_amount: f64,
}

impl Envelope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: 0.0,
            target_amount: None,
            target_date: None,
            linked_account_id: None,
            group_id: None,
            cash_flow_enabled: false,
            cash_flow_amount: 0.0,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_target(mut self, target_amount: f64, target_date: Option<NaiveDate>) -> Self {
        self.target_amount = Some(target_amount);
        self.target_date = target_date;
        self
    }

    pub fn linked_to(mut self, account_id: Uuid) -> Self {
        self.linked_account_id = Some(account_id);
        self
    }

    pub fn in_group(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Enables the per-pay-period contribution at the given amount.
    pub fn with_cash_flow(mut self, amount: f64) -> Self {
        self.cash_flow_enabled = true;
        self.cash_flow_amount = amount;
        self
    }

    pub fn has_unmet_target(&self) -> bool {
        self.target_amount
            .map(|target| self.amount < target)
            .unwrap_or(false)
    }
}

impl Identifiable for Envelope {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Envelope {
    fn name(&self) -> &str {
        &self.name
    }
}
