#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{config_from_env, connect_with_config};

// Migrations run once per test process; `false` means no database is reachable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Connection to the test database, or `None` when DB tests are skipped.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let ready = *MIGRATED
        .get_or_init(|| async {
            let mut cfg = config_from_env();
            cfg.connect_timeout_secs = 3;
            let Ok(db) = connect_with_config(&cfg).await else {
                eprintln!("skipping db tests: cannot connect to {}", cfg.url);
                return false;
            };
            match migration::Migrator::up(&db, None).await {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("skipping db tests: migrate up failed: {e}");
                    false
                }
            }
        })
        .await;
    if !ready {
        return Ok(None);
    }

    // fresh pool for the current test's runtime
    let mut cfg = config_from_env();
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    let db = connect_with_config(&cfg).await?;
    Ok(Some(db))
}
