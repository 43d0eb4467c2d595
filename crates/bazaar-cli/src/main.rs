mod db;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "bazaar-cli")]
#[command(about = "Marketplace search command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a search for a URL query string and print the outcome as JSON
    Search {
        /// Query string, e.g. "type=sellers&category=Furniture"
        #[arg(default_value = "")]
        query: String,
    },
    /// Apply parameter changes to a query string and print the result
    Url {
        /// Current query string
        #[arg(default_value = "")]
        current: String,
        /// Codec key assignment; an empty value clears the key (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = search::parse_assignment)]
        set: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        None => println!("bazaar-cli ready; run with --help for commands"),
        Some(Commands::Url { current, set }) => {
            init_tracing(EnvFilter::from_default_env());
            println!("{}", search::run_url(&current, &set)?);
        }
        Some(Commands::Db { command }) => {
            let (config, pool) = connect().await?;
            db::run(&pool, &config, command).await?;
        }
        Some(Commands::Search { query }) => {
            let (_, pool) = connect().await?;
            search::run_search(pool, &query).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn connect() -> anyhow::Result<(bazaar_core::AppConfig, sqlx::PgPool)> {
    let config = bazaar_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    init_tracing(env_filter);

    let pool_config = bazaar_db::PoolConfig::from_app_config(&config);
    let pool = bazaar_db::connect_pool(&config.database_url, pool_config).await?;
    Ok((config, pool))
}
