use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::subscription_store;
use crate::errors::ServiceError;
use crate::subscription::domain::{NewSubscription, PeriodCostQuery, Subscription};
use crate::subscription::repository::SubscriptionRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, ServiceError> {
        let rows = subscription_store::list_by_user(&self.db, user_id).await?;
        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn create(&self, new: &NewSubscription) -> Result<Subscription, ServiceError> {
        subscription_store::create(&self.db, new).await.map(Subscription::from)
    }

    async fn update(&self, id: i32, new: &NewSubscription) -> Result<(), ServiceError> {
        subscription_store::update(&self.db, id, new).await
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        subscription_store::delete(&self.db, id).await
    }

    async fn period_cost(&self, query: &PeriodCostQuery) -> Result<i64, ServiceError> {
        subscription_store::period_cost(&self.db, query).await
    }
}
