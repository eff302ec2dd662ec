//! # Routes
//!
//! Axum router configuration for the merchant API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - API:
///   - POST /api/v1/payment-links - Create payment link
///   - GET  /api/v1/payment-links/{id} - Payment link information
///   - POST /api/v1/payment-links/{id}/cancel - Cancel payment link
///   - POST /api/v1/webhook/confirm - Register webhook URL with payOS
///
/// - Webhooks:
///   - POST /webhook/payos - payOS webhook handler
///
/// - Static pages:
///   - GET /checkout/success - Return page
///   - GET /checkout/cancel - Cancel page
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let checkout_routes = Router::new()
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel));

    let api_routes = Router::new()
        .route("/payment-links", post(handlers::create_payment_link))
        .route("/payment-links/{id}", get(handlers::get_payment_link))
        .route("/payment-links/{id}/cancel", post(handlers::cancel_payment_link))
        .route("/webhook/confirm", post(handlers::confirm_webhook));

    // Webhook routes take the raw body
    let webhook_routes = Router::new().route("/payos", post(handlers::payos_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/checkout", checkout_routes)
        .nest("/api/v1", api_routes)
        .nest("/webhook", webhook_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
