mod config;
mod errors;
mod media;
mod models;
mod pages;
mod routes;
mod session;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::media::HttpMediaStore;
use crate::routes::build_router;
use crate::session::HttpIdentityProvider;
use crate::state::AppState;
use crate::store::HttpRecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Crate name carries a hyphen; tracing targets use underscores.
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CredVault API v{}", env!("CARGO_PKG_VERSION"));

    // Upstream integrations
    let store = Arc::new(HttpRecordStore::new(
        config.record_store_url.clone(),
        config.record_store_token.clone(),
    ));
    info!("Record store client initialized ({})", config.record_store_url);

    let media = Arc::new(HttpMediaStore::new(
        config.media_upload_url.clone(),
        config.media_token.clone(),
    ));
    info!("Media upload client initialized");

    let identity = Arc::new(HttpIdentityProvider::new(config.identity_url.clone()));
    info!("Identity provider client initialized ({})", config.identity_url);

    // Build app state (page controllers live behind locks inside)
    let state = AppState::new(config.clone(), store, media, identity);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
