//! Apply or inspect schema migrations.
//!
//! `migrator [--config <path>] [up|down [n]|status|fresh]`; no command means `up`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "migrator", about = "Manage the subscription schema")]
struct Cli {
    /// Configuration file; defaults to `CONFIG_PATH`, then `config.toml`
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Apply all pending migrations (default)
    Up,
    /// Roll back the last `n` migrations
    Down {
        #[arg(default_value_t = 1)]
        n: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Drop every table and reapply all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let cmd = cli.command.unwrap_or(Command::Up);

    let cfg = configs::AppConfig::load_or_default(cli.config.as_deref())?;
    common::utils::logging::init_logging(&cfg.log.env);

    let db = models::db::connect_with_config(&cfg.database).await?;
    match cmd {
        Command::Up => Migrator::up(&db, None).await?,
        Command::Down { n } => Migrator::down(&db, Some(n)).await?,
        Command::Status => Migrator::status(&db).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
    }
    info!(command = ?cmd, "migrator finished");
    Ok(())
}
