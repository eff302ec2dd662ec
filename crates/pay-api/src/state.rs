//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment gateway, landing-page URLs and server configuration.

use anyhow::Context;
use pay_core::{BoxedPaymentGateway, CheckoutUrls};
use pay_payos::PayOsClient;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL (return/cancel pages and webhook are built from it)
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway
    pub gateway: BoxedPaymentGateway,
    /// Return/cancel landing pages
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the payOS client
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let payos = PayOsClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize payOS: {}", e))?;

        Ok(Self::with_gateway(Arc::new(payos), config))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(gateway: BoxedPaymentGateway, config: AppConfig) -> Self {
        let urls = CheckoutUrls::new(&config.base_url);
        Self {
            gateway,
            urls,
            config,
        }
    }

    /// Public URL payOS should deliver webhooks to
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.urls.base_url, self.gateway.webhook_path())
    }
}
