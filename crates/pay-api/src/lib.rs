//! # pay-api
//!
//! Merchant HTTP service for payos-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server over a `PaymentGateway`
//! - REST endpoints for payment links
//! - The payOS webhook endpoint
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/payment-links` | Create payment link |
//! | GET | `/api/v1/payment-links/{id}` | Payment link information |
//! | POST | `/api/v1/payment-links/{id}/cancel` | Cancel payment link |
//! | POST | `/api/v1/webhook/confirm` | Register webhook URL |
//! | POST | `/webhook/payos` | payOS webhook |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
