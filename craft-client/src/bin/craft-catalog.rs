//! craft-catalog - command line front end for the catalog store
//!
//! Reads its configuration from the environment (`.env` honoured).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use craft_client::image::{check_extension, compress_image};
use craft_client::{AdminGate, CatalogSync, ClientConfig};

#[derive(Parser)]
#[command(name = "craft-catalog")]
#[command(about = "Inspect and maintain the craft storefront catalog", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and print it with any status notices
    List,

    /// Compress an image into the data URI stored with items
    Compress {
        /// PNG, JPEG or WebP file
        path: std::path::PathBuf,
    },

    /// Check whether a secret unlocks admin mode
    Admin {
        secret: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    craft_client::logger::init_logger(&cli.log_level, cli.json_logs)?;
    let config = ClientConfig::from_env();

    match cli.command {
        Commands::List => list(&config).await,
        Commands::Compress { path } => compress(&path).await,
        Commands::Admin { secret } => {
            let gate = AdminGate::new(config.admin_secret.as_deref());
            if gate.login(&secret) {
                println!("Admin mode enabled.");
            } else {
                println!("Incorrect password.");
            }
            Ok(())
        }
    }
}

async fn list(config: &ClientConfig) -> Result<()> {
    let sync = CatalogSync::connect(config).context("Failed to set up catalog sync")?;
    let mut notices = sync.subscribe();
    let mode = sync.load_catalog().await;

    println!("Catalog ({})", mode);
    for item in sync.items().await {
        println!(
            "{:>16}  {:<8}  {:>8}  {}  [{} image(s)]",
            item.id,
            item.category.as_str(),
            item.price.round_dp(2).to_string(),
            item.name,
            item.images.len()
        );
    }
    while let Ok(notice) = notices.try_recv() {
        println!("! {}", notice);
    }
    Ok(())
}

async fn compress(path: &std::path::Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .context("Invalid file extension")?;
    check_extension(ext)?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let uri = compress_image(&data)?;
    println!(
        "{}: {} bytes -> {} byte data URI",
        path.display(),
        data.len(),
        uri.len()
    );
    Ok(())
}
