use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::app::app;
use crate::auth::{ClientSecrets, GoogleProvider, SessionKeys};
use crate::config::config;
use crate::database::{CatalogRepository, DatabaseManager};
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind host (overrides CATALOG_HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Bind port (overrides CATALOG_PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config().clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;
    info!("Starting {} in {:?} mode", config.server.application_name, config.environment);

    let pool = DatabaseManager::open(&config.database)
        .await
        .context("failed to open the catalog database")?;

    let secrets = ClientSecrets::from_file(&config.oauth.client_secrets_path)
        .context("failed to load OAuth client secrets")?;
    let session_keys = SessionKeys::new(&config.session)?;

    let state = AppState::new(
        CatalogRepository::new(pool),
        session_keys,
        Arc::new(GoogleProvider::new(secrets)),
        config.server.application_name.as_str(),
    );

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
