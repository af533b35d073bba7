use clap::Parser;
use tracing_subscriber::EnvFilter;

use item_catalog::cli::{self, Cli};
use item_catalog::is_development;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up SESSION_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    let default_level = if is_development!() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    cli::run(Cli::parse()).await
}
