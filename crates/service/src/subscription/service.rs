use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::domain::{NewSubscription, PeriodCostInput, PeriodCostQuery, Subscription, SubscriptionInput};
use super::repository::SubscriptionRepository;
use crate::context::OpContext;
use crate::errors::ServiceError;

/// Subscription operations independent of web framework.
///
/// Parses wire dates before touching the store, runs each store call under the
/// caller's [`OpContext`], and records per-operation metrics.
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self { Self { repo } }

    /// List a user's subscriptions; a user without any is `NotFound`.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn list_by_user(&self, ctx: &OpContext, user_id: Uuid) -> Result<Vec<Subscription>, ServiceError> {
        observe("list_by_user", ctx.run(self.repo.list_by_user(user_id))).await
    }

    /// Create a subscription.
    ///
    /// # Examples
    /// ```
    /// use service::context::OpContext;
    /// use service::subscription::{SubscriptionService, domain::SubscriptionInput, repository::mock::MockSubscriptionRepository};
    /// use std::sync::Arc;
    /// let svc = SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()));
    /// let input = SubscriptionInput { user_id: uuid::Uuid::new_v4(), service_name: "Netflix".into(), price: 499, start_date: "09-2025".into() };
    /// let created = tokio_test::block_on(svc.create(&OpContext::background(), input)).unwrap();
    /// assert_eq!(created.start_date.to_string(), "09-2025");
    /// ```
    #[instrument(skip_all, fields(user_id = %input.user_id, service = %input.service_name))]
    pub async fn create(&self, ctx: &OpContext, input: SubscriptionInput) -> Result<Subscription, ServiceError> {
        let new = parse("create", NewSubscription::try_from(input))?;
        observe("create", ctx.run(self.repo.create(&new))).await
    }

    /// Replace every field of row `id`.
    #[instrument(skip_all, fields(id = id, user_id = %input.user_id))]
    pub async fn update(&self, ctx: &OpContext, id: i32, input: SubscriptionInput) -> Result<(), ServiceError> {
        let new = parse("update", NewSubscription::try_from(input))?;
        observe("update", ctx.run(self.repo.update(id, &new))).await
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn delete(&self, ctx: &OpContext, id: i32) -> Result<(), ServiceError> {
        observe("delete", ctx.run(self.repo.delete(id))).await
    }

    /// Total price of the user's subscriptions starting within `[start_date, end_date]`,
    /// optionally restricted to the named services.
    #[instrument(skip_all, fields(user_id = %input.user_id, services = input.service_names.len()))]
    pub async fn period_cost(&self, ctx: &OpContext, input: PeriodCostInput) -> Result<i64, ServiceError> {
        let query: PeriodCostQuery = parse("period_cost", PeriodCostQuery::try_from(input))?;
        observe("period_cost", ctx.run(self.repo.period_cost(&query))).await
    }
}

fn parse<T>(op: &'static str, res: Result<T, models::errors::ModelError>) -> Result<T, ServiceError> {
    res.map_err(|e| {
        let e = ServiceError::from(e);
        debug!(op, err = %e, "rejected input");
        common::metrics::count_store_operation(op, e.kind());
        e
    })
}

async fn observe<T, F>(op: &'static str, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    let start = Instant::now();
    let res = fut.await;
    let elapsed = start.elapsed().as_secs_f64();
    match &res {
        Ok(_) => {
            debug!(op, elapsed_ms = elapsed * 1000.0, "store operation ok");
            common::metrics::observe_store_operation(op, "ok", elapsed);
        }
        Err(e) => {
            if e.is_expected() {
                debug!(op, code = e.code(), err = %e, "store operation rejected");
            } else {
                error!(op, code = e.code(), err = %e, "store operation failed");
            }
            common::metrics::observe_store_operation(op, e.kind(), elapsed);
        }
    }
    res
}
