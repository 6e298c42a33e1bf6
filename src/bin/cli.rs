//! shelfwatch CLI
//!
//! Local execution entry point for the storefront monitor.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelfwatch::{
    error::Result,
    models::Config,
    notify::{LogNotifier, Notifier, WebhookNotifier},
    pipeline,
    services::HttpStorefront,
    storage::{LocalStore, SnapshotStore},
};

/// shelfwatch - Storefront change monitor
#[derive(Parser, Debug)]
#[command(
    name = "shelfwatch",
    version,
    about = "Snapshot-diff monitor for storefront catalogs"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one monitor cycle: acquire, diff, notify, persist
    Run {
        /// Override the storefront base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Override the notification webhook address
        #[arg(long)]
        webhook: Option<String>,

        /// Override the snapshot file path
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show configuration and snapshot status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("shelfwatch starting...");

    // File first, then environment, then flags
    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    match cli.command {
        Command::Run {
            base_url,
            webhook,
            snapshot,
        } => {
            if let Some(base_url) = base_url {
                config.store.base_url = base_url;
            }
            if let Some(webhook) = webhook {
                config.notify.webhook_url = Some(webhook);
            }
            if let Some(snapshot) = snapshot {
                config.snapshot.path = snapshot.display().to_string();
            }
            config.validate()?;

            log::info!("Monitoring {}", config.store.base_url);

            let storefront = HttpStorefront::new(&config)?;
            let store = LocalStore::new(&config.snapshot.path);
            let notifier: Box<dyn Notifier> = match &config.notify.webhook_url {
                Some(url) => Box::new(WebhookNotifier::new(&config.http, url)?),
                None => Box::new(LogNotifier),
            };

            match pipeline::run_monitor(&config, &storefront, &store, &*notifier).await {
                Ok(summary) => {
                    log::info!(
                        "Run complete: tracked {} products, {} events, took {}s",
                        summary.products,
                        summary.events,
                        (summary.finished_at - summary.started_at).num_seconds()
                    );
                }
                Err(error) => {
                    log::error!("Run failed: {error}");
                    return Err(error);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration from {}", cli.config.display());

            if !cli.config.exists() {
                log::error!("Config file not found at {}", cli.config.display());
                return Err(shelfwatch::error::AppError::config("Config file not found"));
            }

            let loaded = Config::load(&cli.config)?;
            if let Err(error) = loaded.validate() {
                log::error!("Config validation failed: {error}");
                return Err(error);
            }
            log::info!("✓ Config OK");
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config.display());
            log::info!("Storefront: {}", config.store.base_url);
            log::info!(
                "Webhook: {}",
                if config.notify.webhook_url.is_some() {
                    "configured"
                } else {
                    "not set"
                }
            );

            let snapshot_path = PathBuf::from(&config.snapshot.path);
            if snapshot_path.exists() {
                let store = LocalStore::new(&snapshot_path);
                let snapshot = store.load().await;
                log::info!(
                    "Snapshot: {} products tracked in {}",
                    snapshot.len(),
                    snapshot_path.display()
                );
            } else {
                log::info!("No snapshot found yet.");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
