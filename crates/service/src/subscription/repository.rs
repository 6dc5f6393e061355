use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewSubscription, PeriodCostQuery, Subscription};
use crate::errors::ServiceError;

/// Repository abstraction for subscription persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Ordered by id. Zero rows is `NotFound`.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, ServiceError>;
    async fn create(&self, new: &NewSubscription) -> Result<Subscription, ServiceError>;
    async fn update(&self, id: i32, new: &NewSubscription) -> Result<(), ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
    /// Zero matching rows sums to 0.
    async fn period_cost(&self, query: &PeriodCostQuery) -> Result<i64, ServiceError>;
}

/// In-memory repository with the same outcomes as the database one, for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct State {
        next_id: i32,
        rows: BTreeMap<i32, Subscription>,
    }

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        state: Mutex<State>,
        delay: Option<Duration>,
        unavailable: bool,
    }

    impl MockSubscriptionRepository {
        /// Every call sleeps for `delay` first.
        pub fn with_delay(delay: Duration) -> Self {
            Self { delay: Some(delay), ..Self::default() }
        }

        /// Every call fails with a storage failure.
        pub fn unavailable() -> Self {
            Self { unavailable: true, ..Self::default() }
        }

        pub async fn len(&self) -> usize {
            self.state.lock().await.rows.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        async fn enter(&self) -> Result<(), ServiceError> {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            if self.unavailable {
                return Err(ServiceError::Storage("connection refused".into()));
            }
            Ok(())
        }
    }

    fn clashes(existing: &Subscription, new: &NewSubscription) -> bool {
        existing.user_id == new.user_id && existing.service_name == new.service_name && existing.start_date == new.start
    }

    fn duplicate() -> ServiceError {
        ServiceError::DuplicateEntry("uniq_subscription_user_service_start".into())
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, ServiceError> {
            self.enter().await?;
            let state = self.state.lock().await;
            let rows: Vec<Subscription> = state.rows.values().filter(|s| s.user_id == user_id).cloned().collect();
            if rows.is_empty() {
                return Err(ServiceError::NotFound(format!("no subscriptions for user {}", user_id)));
            }
            Ok(rows)
        }

        async fn create(&self, new: &NewSubscription) -> Result<Subscription, ServiceError> {
            self.enter().await?;
            let mut state = self.state.lock().await;
            if state.rows.values().any(|s| clashes(s, new)) {
                return Err(duplicate());
            }
            state.next_id += 1;
            let created = Subscription {
                id: state.next_id,
                user_id: new.user_id,
                service_name: new.service_name.clone(),
                price: new.price,
                start_date: new.start,
            };
            state.rows.insert(created.id, created.clone());
            Ok(created)
        }

        async fn update(&self, id: i32, new: &NewSubscription) -> Result<(), ServiceError> {
            self.enter().await?;
            let mut state = self.state.lock().await;
            if !state.rows.contains_key(&id) {
                return Err(ServiceError::not_found("subscription"));
            }
            if state.rows.values().any(|s| s.id != id && clashes(s, new)) {
                return Err(duplicate());
            }
            state.rows.insert(id, Subscription {
                id,
                user_id: new.user_id,
                service_name: new.service_name.clone(),
                price: new.price,
                start_date: new.start,
            });
            Ok(())
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.enter().await?;
            match self.state.lock().await.rows.remove(&id) {
                Some(_) => Ok(()),
                None => Err(ServiceError::not_found("subscription")),
            }
        }

        async fn period_cost(&self, query: &PeriodCostQuery) -> Result<i64, ServiceError> {
            self.enter().await?;
            let state = self.state.lock().await;
            Ok(state.rows.values().filter(|s| query.matches(s)).map(|s| i64::from(s.price)).sum())
        }
    }
}
