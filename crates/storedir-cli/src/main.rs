mod browse;
mod liked;
mod render;
mod stores;

use clap::{Parser, Subcommand};
use storedir_core::StoreId;
use tracing_subscriber::EnvFilter;

use crate::stores::FilterArgs;

#[derive(Debug, Parser)]
#[command(name = "storedir")]
#[command(about = "Storefront directory command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stores matching a filter set
    Stores {
        #[command(flatten)]
        filters: FilterArgs,
        /// Number of pages to fetch (stops early at the end of the list)
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// List store categories
    Categories,
    /// Like a store, or unlike it if it is already liked
    Like {
        /// Store id
        id: StoreId,
    },
    /// Show liked store ids
    Liked,
    /// Interactive store browser
    Browse {
        /// Starting query string, as it would appear in the address bar
        #[arg(long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = storedir_core::load_app_config()?;

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, api = %config.api_base_url, "configuration loaded");

    match cli.command {
        Some(Commands::Stores { filters, pages }) => {
            stores::run_stores(&config, &filters, pages).await?;
        }
        Some(Commands::Categories) => stores::run_categories(&config).await?,
        Some(Commands::Like { id }) => liked::run_like(&config, id)?,
        Some(Commands::Liked) => liked::run_liked(&config),
        Some(Commands::Browse { query }) => {
            browse::run_browse(&config, query.as_deref().unwrap_or_default()).await?;
        }
        None => println!("storedir: run with --help to see available commands"),
    }

    Ok(())
}
