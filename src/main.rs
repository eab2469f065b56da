//! vinted-watch - Live mirror of the newest Vinted listings
//!
//! Serves a self-refreshing page of the newest listings for a set of brands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use vinted_watch::commands::FetchCommand;
use vinted_watch::config::{Config, OutputFormat};
use vinted_watch::vinted::brands::{self, BRANDS};
use vinted_watch::vinted::{FilterSelection, Market, VintedClient};
use vinted_watch::web::{self, AppState};

#[derive(Parser)]
#[command(
    name = "vinted-watch",
    version,
    about = "Live mirror of the newest Vinted listings",
    long_about = "Polls the Vinted catalog with TLS fingerprint emulation and serves the newest listings for a set of brands."
)]
struct Cli {
    /// Vinted marketplace (defaults to the config file, then fr)
    #[arg(short, long, global = true)]
    market: Option<Market>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "VINTED_PROXY")]
    proxy: Option<String>,

    /// Seconds a fetched result is reused
    #[arg(long, global = true, env = "VINTED_CACHE_TTL")]
    cache_ttl: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the watch page
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Fetch the newest listings once and print them
    #[command(alias = "f")]
    Fetch {
        /// Brand identifiers (comma-separated or repeated); all brands when omitted
        #[arg(short, long = "brand", value_delimiter = ',')]
        brands: Vec<String>,
    },

    /// List the known brands
    Brands,

    /// List supported marketplaces
    Markets,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level =
        if matches!(cli.command, Commands::Serve { .. }) { Level::INFO } else { Level::WARN };
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(default_level.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(market) = cli.market {
        config.market = market;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(ttl) = cli.cache_ttl {
        config.cache_ttl_secs = ttl;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let client =
                VintedClient::new(&config).await.context("Failed to create HTTP client")?;
            info!(
                "Watching {} with a {}s cache",
                config.market.host(),
                config.cache_ttl_secs
            );

            let state = Arc::new(AppState::new(client, config.cache_ttl()));
            web::serve(state, &config.bind_addr()).await?;
        }

        Commands::Fetch { brands: ids } => {
            let selection = if ids.is_empty() {
                FilterSelection::new(brands::all_ids())
            } else {
                FilterSelection::new(&ids)
            };

            let cmd = FetchCommand::new(config);
            let output = cmd.execute(&selection).await?;
            println!("{}", output);
        }

        Commands::Brands => {
            println!("Known brands:\n");
            println!("{:<10} {:<30}", "ID", "Name");
            println!("{:-<10} {:-<30}", "", "");

            for brand in BRANDS {
                println!("{:<10} {:<30}", brand.id, brand.name);
            }
        }

        Commands::Markets => {
            println!("Supported Vinted marketplaces:\n");
            println!("{:<6} {:<20} {:<26}", "Code", "Host", "Accept-Language");
            println!("{:-<6} {:-<20} {:-<26}", "", "", "");

            for market in Market::all() {
                println!(
                    "{:<6} {:<20} {:<26}",
                    market.to_string(),
                    market.host(),
                    market.accept_language()
                );
            }
        }
    }

    Ok(())
}
