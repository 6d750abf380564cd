mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::generator::DocumentGenerator;
use crate::llm_client::ProviderHandle;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values, not on missing ones)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartDoc API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize content provider
    let provider = ProviderHandle::from_api_key(config.gemini_api_key.as_deref())
        .context("failed to build Gemini client")?;
    let generator = DocumentGenerator::new(provider);
    if generator.is_configured() {
        info!("Gemini client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GEMINI_API_KEY is not set; document generation will return PROVIDER_UNAVAILABLE");
    }

    info!(
        "Export page {}x{} mm, upload limit {} bytes",
        layout::EXPORT_PAGE.width,
        layout::EXPORT_PAGE.height,
        config.max_surface_bytes
    );

    // Build app state
    let state = AppState {
        generator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser client is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
