use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Subscription: lookups and period sums are always scoped by user
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_user")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .to_owned(),
            )
            .await?;

        // Subscription: composite unique (user_id, service_name, start_date)
        manager
            .create_index(
                Index::create()
                    .name("uniq_subscription_user_service_start")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .col(Subscription::ServiceName)
                    .col(Subscription::StartDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_subscription_user").table(Subscription::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_subscription_user_service_start").table(Subscription::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscription { Table, UserId, ServiceName, StartDate }
