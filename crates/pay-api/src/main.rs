//! # payos-merchant
//!
//! Merchant-side service for the payOS gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYOS_CLIENT_ID=...
//! export PAYOS_API_KEY=...
//! export PAYOS_CHECKSUM_KEY=...
//! export BASE_URL=https://shop.example
//!
//! # Run the server
//! payos-merchant
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!(
        "payos-merchant {} ({})",
        env!("CARGO_PKG_VERSION"),
        state.config.environment
    );
    info!("Gateway: {}", state.gateway.provider_name());

    if !is_prod {
        info!("Payment links: POST http://{}/api/v1/payment-links", addr);
        info!("Webhook: POST {}", state.webhook_url());
    }

    let app = routes::create_router(state);

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
