//! Create `subscription` table.
//!
//! One row per (user, service, start month). `start_date` holds the first day
//! of the subscribed month.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscription::Id))
                    .col(uuid(Subscription::UserId).not_null())
                    .col(string_len(Subscription::ServiceName, 255).not_null())
                    .col(integer(Subscription::Price).not_null())
                    .col(date(Subscription::StartDate).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    UserId,
    ServiceName,
    Price,
    StartDate,
}
