//! Delivery subscriptions and their pause/resume toggle

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    FarmToDoor,
    AdoptARooftop,
    SeasonalBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    Monthly,
}

impl Frequency {
    pub fn label_key(&self) -> &'static str {
        match self {
            Frequency::Weekly => "everyWeek",
            Frequency::BiWeekly => "everyTwoWeeks",
            Frequency::Monthly => "everyMonth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn label_key(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    Pause,
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action:?} a cancelled subscription")]
pub struct SubscriptionClosed {
    pub action: SubscriptionAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub kind: SubscriptionKind,
    pub name: String,
    pub price: f64,
    pub frequency: Frequency,
    #[serde(default)]
    pub status: SubscriptionStatus,
    pub next_delivery: NaiveDate,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Pauses or resumes delivery. Applying the state a subscription is
    /// already in is a no-op; cancelled subscriptions stay cancelled.
    pub fn apply(&mut self, action: SubscriptionAction) -> Result<SubscriptionStatus, SubscriptionClosed> {
        if self.status == SubscriptionStatus::Cancelled {
            return Err(SubscriptionClosed { action });
        }

        let next = match action {
            SubscriptionAction::Pause => SubscriptionStatus::Paused,
            SubscriptionAction::Resume => SubscriptionStatus::Active,
        };
        if next != self.status {
            self.status = next;
            self.updated_at = Some(Utc::now());
        }
        Ok(self.status)
    }
}
