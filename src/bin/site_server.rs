// Site server binary entry point
//
// Usage: cargo run --bin site_server

use bakery_site::{create_router, AppState, SiteConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "bakery_site=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting site server...");

    // Configuration from environment variables
    let config = SiteConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  WORDPRESS_URL: {}", config.wordpress_url);
    tracing::info!(
        "  WP_API_USERNAME: {}",
        config.credentials.as_ref().map(|c| c.username.as_str()).unwrap_or("<unset>")
    );
    tracing::info!("  DEFAULT_FORM_ID: {}", config.default_form_id);
    tracing::info!("  CACHE_TTL: {:?}", config.cache_ttl);
    tracing::info!("  PORT: {}", config.port);

    let port = config.port;
    let state = AppState::new(config)?;

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
