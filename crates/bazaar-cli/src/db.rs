//! `db` subcommands: connectivity, migrations and catalog seeding.

use bazaar_core::{load_catalog, AppConfig};
use clap::Subcommand;
use sqlx::PgPool;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert categories and product types from the catalog file
    Seed,
}

pub(crate) async fn run(
    pool: &PgPool,
    config: &AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            bazaar_db::ping(pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = bazaar_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => {
            let catalog = load_catalog(&config.catalog_path)?;
            tracing::info!(path = %config.catalog_path.display(), "seeding catalog");
            let summary = bazaar_db::seed_catalog(pool, &catalog).await?;
            println!(
                "seeded {} categories, {} product types",
                summary.categories, summary.product_types
            );
        }
    }
    Ok(())
}
