use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use importer::{
    AzureClient, CatalogImporter, ClientCredentials, ImportContext, ImportSettings,
    PriceImporter, SkuImporter, TokenProvider, config::DEFAULT_PRICE_API_URL,
};
use std::time::Duration;
use storage::{CatalogStore, Database, InMemoryCatalogStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "pricing-import")]
#[command(about = "Azure retail pricing and SKU catalog importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Run against an in-memory store instead of PostgreSQL
    #[arg(long, global = true)]
    dry_run: bool,

    #[arg(long, global = true)]
    skip_migrations: bool,

    #[arg(long, env = "PRICE_API_URL", default_value = DEFAULT_PRICE_API_URL, global = true)]
    price_api_url: String,

    #[arg(long, env = "IMPORT_PAGES_PER_BATCH", default_value_t = 10, global = true)]
    pages_per_batch: u32,

    #[arg(long, env = "IMPORT_BATCH_PAUSE_SECS", default_value_t = 2, global = true)]
    batch_pause_secs: u64,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Store providers, regions and services referenced by the prices feed
    Prices,
    /// Join the prices feed with the subscription's SKU catalog
    Skus {
        #[command(flatten)]
        azure: AzureArgs,
    },
}

#[derive(clap::Args)]
struct AzureArgs {
    #[arg(long, env = "AZURE_CLIENT_ID")]
    client_id: Option<String>,

    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    #[arg(long, env = "AZURE_TENANT_ID")]
    tenant_id: Option<String>,

    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    subscription_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "pricing_import={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ImportSettings {
        price_api_url: cli.price_api_url.clone(),
        pages_per_batch: cli.pages_per_batch,
        batch_pause: Duration::from_secs(cli.batch_pause_secs),
        ..Default::default()
    };
    settings.validate().context("Invalid import settings")?;

    let importer = build_importer(&cli.command, &settings)?;
    info!("Starting {} import", importer.name());

    if cli.dry_run {
        info!("Dry run: rows are kept in memory and discarded on exit");
        let store = InMemoryCatalogStore::new();
        run_import(importer.as_ref(), &store, &settings).await?;
        info!(
            "Dry run produced {} providers, {} regions, {} services, {} SKUs",
            store.providers().len(),
            store.regions().len(),
            store.services().len(),
            store.skus().len()
        );
        return Ok(());
    }

    let database_url = cli
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set unless --dry-run is given")?;

    let db = Database::new(database_url).await.context("Failed to connect to database")?;

    if !cli.skip_migrations {
        db.run_migrations().await.context("Failed to run migrations")?;
        info!("Migrations applied");
    }

    let catalog = db.catalog();
    run_import(importer.as_ref(), &catalog, &settings).await
}

fn build_importer(
    command: &Commands,
    settings: &ImportSettings,
) -> Result<Box<dyn CatalogImporter>> {
    let client = AzureClient::new(settings.management_api_url.as_str())
        .context("Failed to build HTTP client")?;

    match command {
        Commands::Prices => Ok(Box::new(PriceImporter::new(client))),
        Commands::Skus { azure } => {
            let credentials = ClientCredentials::from_parts(
                azure.client_id.clone(),
                azure.client_secret.clone(),
                azure.tenant_id.clone(),
            )?;
            let tokens = TokenProvider::new(client.http().clone(), settings.login_url.as_str());
            let subscription_id = azure.subscription_id.clone().unwrap_or_default();

            Ok(Box::new(SkuImporter::new(client, tokens, credentials, subscription_id)?))
        }
    }
}

async fn run_import(
    importer: &dyn CatalogImporter,
    store: &dyn CatalogStore,
    settings: &ImportSettings,
) -> Result<()> {
    let context = ImportContext { store, settings };

    let summary = importer
        .import(&context)
        .await
        .with_context(|| format!("{} import failed", importer.name()))?;

    info!(
        "{} import finished: {} pages, {} items ({} skipped), {} SKUs, {} prices, {} terms",
        importer.name(),
        summary.pages,
        summary.items,
        summary.skipped,
        summary.skus_created,
        summary.prices_created,
        summary.terms_created
    );

    Ok(())
}
