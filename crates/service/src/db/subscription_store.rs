//! SQL-level operations on the `subscription` table.
//!
//! Every function issues exactly one statement, so none of them needs a
//! transaction.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use models::subscription::{self, Entity as SubscriptionEntity};
use crate::errors::ServiceError;
use crate::subscription::domain::{NewSubscription, PeriodCostQuery};

/// List a user's subscriptions in id order. Zero rows is `NotFound`.
pub async fn list_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<subscription::Model>, ServiceError> {
    let rows = SubscriptionEntity::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .order_by_asc(subscription::Column::Id)
        .all(db)
        .await?;
    if rows.is_empty() {
        return Err(ServiceError::NotFound(format!("no subscriptions for user {}", user_id)));
    }
    Ok(rows)
}

/// Insert one row; a clash on (user_id, service_name, start_date) is `DuplicateEntry`.
pub async fn create(db: &DatabaseConnection, new: &NewSubscription) -> Result<subscription::Model, ServiceError> {
    let created = subscription::new_active(new.user_id, &new.service_name, new.price, new.start)
        .insert(db)
        .await?;
    Ok(created)
}

/// Overwrite every column except `id`. Zero rows affected is `NotFound`.
pub async fn update(db: &DatabaseConnection, id: i32, new: &NewSubscription) -> Result<(), ServiceError> {
    let res = SubscriptionEntity::update_many()
        .col_expr(subscription::Column::UserId, Expr::value(new.user_id))
        .col_expr(subscription::Column::ServiceName, Expr::value(new.service_name.clone()))
        .col_expr(subscription::Column::Price, Expr::value(new.price))
        .col_expr(subscription::Column::StartDate, Expr::value(new.start.first_day()))
        .filter(subscription::Column::Id.eq(id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("subscription"));
    }
    Ok(())
}

/// Hard delete by id. Zero rows affected is `NotFound`.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = SubscriptionEntity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("subscription"));
    }
    Ok(())
}

/// `SELECT SUM(price)` over the user's rows with `start_date` in the inclusive
/// range. The service-name clause is appended only for a non-empty filter, and
/// all values travel as bind parameters.
pub fn period_cost_query(q: &PeriodCostQuery) -> Select<SubscriptionEntity> {
    let mut select = SubscriptionEntity::find()
        .select_only()
        .column_as(Expr::col(subscription::Column::Price).sum(), "total")
        .filter(subscription::Column::UserId.eq(q.user_id))
        .filter(subscription::Column::StartDate.between(q.start.first_day(), q.end.first_day()));
    if !q.service_names.is_empty() {
        select = select.filter(subscription::Column::ServiceName.is_in(q.service_names.iter().cloned()));
    }
    select
}

/// Sum of matching prices. SUM over zero rows is SQL NULL, reported here as 0.
pub async fn period_cost(db: &DatabaseConnection, q: &PeriodCostQuery) -> Result<i64, ServiceError> {
    let total: Option<Option<i64>> = period_cost_query(q)
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::MonthYear;
    use sea_orm::{DbBackend, QueryTrait};

    fn query(names: &[&str]) -> PeriodCostQuery {
        PeriodCostQuery {
            user_id: Uuid::parse_str("60601fee-2bf1-4721-ae6f-7636e79a0cba").unwrap(),
            start: MonthYear::parse("09-2025").unwrap(),
            end: MonthYear::parse("12-2025").unwrap(),
            service_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn period_query_without_filter_has_no_service_clause() {
        let sql = period_cost_query(&query(&[])).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#"SUM("price")"#), "{sql}");
        assert!(sql.contains(r#""user_id" = '60601fee-2bf1-4721-ae6f-7636e79a0cba'"#), "{sql}");
        assert!(sql.contains(r#""start_date" BETWEEN '2025-09-01' AND '2025-12-01'"#), "{sql}");
        assert!(!sql.contains("service_name"), "{sql}");
    }

    #[test]
    fn period_query_with_filter_appends_membership() {
        let sql = period_cost_query(&query(&["Spotify", "Netflix"])).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""service_name" IN ('Spotify', 'Netflix')"#), "{sql}");
    }

    #[test]
    fn period_query_binds_values() {
        let stmt = period_cost_query(&query(&["O'Reilly; DROP TABLE subscription"])).build(DbBackend::Postgres);
        assert!(!stmt.sql.contains("O'Reilly"), "{}", stmt.sql);
        assert!(!stmt.sql.contains("2025-09-01"), "{}", stmt.sql);
        assert!(stmt.sql.contains("$4"), "{}", stmt.sql);
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(4));
    }

    async fn seed(db: &DatabaseConnection, user_id: Uuid, name: &str, price: i32, month: &str) -> Result<subscription::Model, anyhow::Error> {
        let new = NewSubscription { user_id, service_name: name.into(), price, start: MonthYear::parse(month)? };
        Ok(create(db, &new).await?)
    }

    #[tokio::test]
    async fn subscription_crud_store() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let user_id = Uuid::new_v4();

        // empty list is NotFound
        assert!(matches!(list_by_user(&db, user_id).await, Err(ServiceError::NotFound(_))));

        let a = seed(&db, user_id, "Netflix", 100, "09-2025").await?;
        let b = seed(&db, user_id, "Spotify", 200, "10-2025").await?;
        let listed = list_by_user(&db, user_id).await?;
        assert_eq!(listed.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(listed[0].start_month().to_string(), "09-2025");

        // duplicate triple
        let dup = NewSubscription { user_id, service_name: "Netflix".into(), price: 999, start: MonthYear::parse("09-2025")? };
        assert!(matches!(create(&db, &dup).await, Err(ServiceError::DuplicateEntry(_))));
        assert_eq!(list_by_user(&db, user_id).await?.len(), 2);

        // full replace
        let replacement = NewSubscription { user_id, service_name: "YouTube".into(), price: 150, start: MonthYear::parse("11-2025")? };
        update(&db, a.id, &replacement).await?;
        let after = SubscriptionEntity::find_by_id(a.id).one(&db).await?.unwrap();
        assert_eq!(after.service_name, "YouTube");
        assert_eq!(after.price, 150);
        assert_eq!(after.start_month().to_string(), "11-2025");

        // update onto an existing triple
        let clash = NewSubscription { user_id, service_name: "Spotify".into(), price: 1, start: MonthYear::parse("10-2025")? };
        assert!(matches!(update(&db, a.id, &clash).await, Err(ServiceError::DuplicateEntry(_))));

        // missing ids
        assert!(matches!(update(&db, i32::MAX, &replacement).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete(&db, i32::MAX).await, Err(ServiceError::NotFound(_))));

        delete(&db, a.id).await?;
        let remaining = list_by_user(&db, user_id).await?;
        assert!(remaining.iter().all(|m| m.id != a.id));
        delete(&db, b.id).await?;
        assert!(matches!(delete(&db, b.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn period_cost_store() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let user_id = Uuid::new_v4();
        let ids = vec![
            seed(&db, user_id, "Netflix", 100, "09-2025").await?.id,
            seed(&db, user_id, "Spotify", 200, "10-2025").await?.id,
            seed(&db, user_id, "YouTube", 300, "12-2025").await?.id,
        ];
        // another user's row in range must not count
        let other = seed(&db, Uuid::new_v4(), "Netflix", 10_000, "10-2025").await?;

        let q = PeriodCostQuery { user_id, ..query(&[]) };
        assert_eq!(period_cost(&db, &q).await?, 600);

        let q = PeriodCostQuery { user_id, ..query(&["Spotify"]) };
        assert_eq!(period_cost(&db, &q).await?, 200);

        let q = PeriodCostQuery { user_id, ..query(&["Spotify", "YouTube"]) };
        assert_eq!(period_cost(&db, &q).await?, 500);

        let q = PeriodCostQuery {
            user_id,
            start: MonthYear::parse("01-2020")?,
            end: MonthYear::parse("12-2020")?,
            service_names: vec![],
        };
        assert_eq!(period_cost(&db, &q).await?, 0);

        let q = PeriodCostQuery { user_id, ..query(&["Hulu"]) };
        assert_eq!(period_cost(&db, &q).await?, 0);

        for id in ids { delete(&db, id).await?; }
        delete(&db, other.id).await?;
        Ok(())
    }
}
