mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard_lib::{ApiConfig, FileStore, KeyValueStore, RateLimiter, SecureClient, SessionEvent};

use crate::commands::Context;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Browse the product catalog and procurement plans from the terminal")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// File holding the client ID and auth token between runs
    #[arg(long, default_value = ".dashboard-state.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, search, filter and sort products
    Products(Box<commands::products::ProductsArgs>),
    /// List product categories
    Categories(commands::categories::CategoriesArgs),
    /// Create a product
    CreateProduct(commands::product_actions::CreateProductArgs),
    /// Update fields of a product
    UpdateProduct(commands::product_actions::UpdateProductArgs),
    /// Delete a product
    DeleteProduct(commands::product_actions::DeleteProductArgs),
    /// List procurement plan packages
    Procurement(Box<commands::procurement::ProcurementArgs>),
    /// Manage the stored auth token
    #[command(subcommand)]
    Auth(commands::auth::AuthCommands),
    /// Show the local rate-limit budget
    RateLimit,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dashboard=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;

    let config = ApiConfig::from_env()?;
    config.log_summary();

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&cli.store)?);
    let limiter = RateLimiter::shared(config.max_requests_per_window, config.rate_limit_window);

    let catalog = Arc::new(SecureClient::from_config(
        &config.catalog_url,
        &config,
        Arc::clone(&store),
        Arc::clone(&limiter),
    )?);
    let procurement = Arc::new(SecureClient::from_config(
        &config.base_url,
        &config,
        Arc::clone(&store),
        limiter,
    )?);

    for client in [&catalog, &procurement] {
        let mut events = client.subscribe();
        let base_url = client.base_url().to_string();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if event == SessionEvent::Unauthorized {
                    tracing::warn!(%base_url, "Session expired; run `dashboard auth login <token>`");
                }
            }
        });
    }

    let ctx = Context {
        config,
        catalog,
        procurement,
    };

    match &cli.command {
        Commands::Products(args) => commands::products::run(args.as_ref(), &ctx, &format).await?,
        Commands::Categories(args) => commands::categories::run(args, &ctx, &format).await?,
        Commands::CreateProduct(args) => {
            commands::product_actions::create(args, &ctx, &format).await?
        }
        Commands::UpdateProduct(args) => {
            commands::product_actions::update(args, &ctx, &format).await?
        }
        Commands::DeleteProduct(args) => {
            commands::product_actions::delete(args, &ctx, &format).await?
        }
        Commands::Procurement(args) => {
            commands::procurement::run(args.as_ref(), &ctx, &format).await?
        }
        Commands::Auth(cmd) => commands::auth::run(cmd, &ctx, &format)?,
        Commands::RateLimit => commands::rate_limit::run(&ctx, &format)?,
    }

    Ok(())
}
