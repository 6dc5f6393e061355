use models::MonthYear;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted subscription (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i32,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: MonthYear,
}

impl From<models::subscription::Model> for Subscription {
    fn from(m: models::subscription::Model) -> Self {
        Subscription {
            id: m.id,
            start_date: m.start_month(),
            user_id: m.user_id,
            service_name: m.service_name,
            price: m.price,
        }
    }
}

/// Create/update input as received, with the date still in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start_date: String,
}

/// Validated create/update input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub start: MonthYear,
}

impl TryFrom<SubscriptionInput> for NewSubscription {
    type Error = models::errors::ModelError;

    fn try_from(input: SubscriptionInput) -> Result<Self, Self::Error> {
        Ok(NewSubscription {
            start: MonthYear::parse(&input.start_date)?,
            user_id: input.user_id,
            service_name: input.service_name,
            price: input.price,
        })
    }
}

/// Period cost request as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodCostInput {
    pub user_id: Uuid,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub service_names: Vec<String>,
}

/// Validated period cost request; both bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodCostQuery {
    pub user_id: Uuid,
    pub start: MonthYear,
    pub end: MonthYear,
    /// Empty means every service.
    pub service_names: Vec<String>,
}

impl PeriodCostQuery {
    pub fn matches(&self, s: &Subscription) -> bool {
        s.user_id == self.user_id
            && self.start <= s.start_date
            && s.start_date <= self.end
            && (self.service_names.is_empty() || self.service_names.iter().any(|n| *n == s.service_name))
    }
}

impl TryFrom<PeriodCostInput> for PeriodCostQuery {
    type Error = models::errors::ModelError;

    fn try_from(input: PeriodCostInput) -> Result<Self, Self::Error> {
        Ok(PeriodCostQuery {
            start: MonthYear::parse(&input.start_date)?,
            end: MonthYear::parse(&input.end_date)?,
            user_id: input.user_id,
            service_names: input.service_names,
        })
    }
}
