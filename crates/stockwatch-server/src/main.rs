use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use stockwatch_api::{SendGridClient, ShopifyClient};
use stockwatch_core::{Config, EmailNotifier, Orchestrator, ShopifyCatalog};
use stockwatch_server::{build_router, start_server, TriggerAuth};
use stockwatch_store::FsLedgerStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stockwatch")]
#[command(version, about = "Low-stock alerting for a Shopify storefront", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the webhook/scheduler HTTP server
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one inventory check and exit
    Check,
    /// Run one reminder check and exit
    Remind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    let orchestrator = Arc::new(build_orchestrator(&config)?);

    match cli.command {
        Some(Commands::Check) => {
            let summary = orchestrator.run_inventory_check().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(Commands::Remind) => {
            let summary = orchestrator.run_reminder_check().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Some(Commands::Serve { bind }) => serve(config, orchestrator, bind).await?,
        None => serve(config, orchestrator, None).await?,
    }

    Ok(())
}

async fn serve(
    config: Config,
    orchestrator: Arc<Orchestrator>,
    bind_override: Option<String>,
) -> anyhow::Result<()> {
    let auth = TriggerAuth::new(
        config.server.webhook_secret.clone(),
        config.server.api_token.clone(),
    );
    if auth.webhook_secret.is_none() && auth.api_token.is_none() {
        tracing::warn!(
            "no webhook secret or API token configured - every trigger will be rejected"
        );
    }

    let bind = bind_override.unwrap_or_else(|| config.server.bind.clone());
    let bind_addr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address '{}': {}", bind, e))?;

    let router = build_router(orchestrator, auth);
    let addr = start_server(router, bind_addr).await?;
    tracing::info!(%addr, "listening for triggers");

    // Park until interrupted; the server runs on its own task
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let access_token = config
        .shopify
        .access_token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("shopify access token not configured"))?;
    let shopify = ShopifyClient::with_api_version(
        &config.shopify.store,
        access_token,
        &config.shopify.api_version,
    );

    let api_key = config
        .email
        .api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("sendgrid API key not configured"))?;
    let notifier = EmailNotifier::new(
        SendGridClient::new(api_key),
        config.email.sender.clone(),
        config.email.recipients.clone(),
    );

    let ledger_path = match &config.ledger.path {
        Some(path) => path.clone(),
        None => FsLedgerStore::default_path()
            .ok_or_else(|| anyhow::anyhow!("could not determine a data directory"))?,
    };

    Ok(Orchestrator::new(
        Box::new(ShopifyCatalog::new(shopify)),
        Box::new(notifier),
        Box::new(FsLedgerStore::new(ledger_path)),
        config.alerts.settings(),
    ))
}
