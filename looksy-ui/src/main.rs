//! looksy-ui - Looksy demo web service
//!
//! Serves the barbershop hairstyle-preview demo: photo upload, AI hair
//! analysis, catalog gallery, and AI preview generation behind a single
//! HTTP endpoint.

use anyhow::Result;
use looksy_common::config::LooksyConfig;
use looksy_common::events::EventBus;
use tracing::info;
use tracing_subscriber::EnvFilter;

use looksy_ui::catalog::Catalog;
use looksy_ui::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting looksy-ui demo service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration (ENV -> TOML -> defaults)
    let config = LooksyConfig::load();
    info!("AI service endpoint: {}", config.ai.base_url);

    // Load the hairstyle catalog; a malformed catalog is fatal at startup
    let catalog = Catalog::load()?;
    info!("Hairstyle catalog loaded: {} styles", catalog.len());

    // Create event bus for SSE broadcasting
    let event_bus = EventBus::new(100);
    info!("Event bus initialized");

    // Create application state
    let state = AppState::new(&config, catalog, event_bus)?;

    // Build router
    let app = looksy_ui::build_router(state);

    // Start server
    let listen_address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    info!("Listening on http://{}", listen_address);
    info!("Health check: http://{}/health", listen_address);

    axum::serve(listener, app).await?;

    Ok(())
}
