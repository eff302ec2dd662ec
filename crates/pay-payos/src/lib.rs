//! # pay-payos
//!
//! payOS gateway client for payos-rs.
//!
//! - **PayOsClient** implements `pay_core::PaymentGateway` against the payOS
//!   merchant API: create, inspect and cancel payment links, and register the
//!   merchant's webhook URL.
//! - **webhook** authenticates inbound payment notifications and dispatches
//!   them to a `WebhookHandler`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_payos::PayOsClient;
//! use pay_core::{PaymentData, PaymentGateway};
//!
//! // Credentials from PAYOS_CLIENT_ID / PAYOS_API_KEY / PAYOS_CHECKSUM_KEY
//! let payos = PayOsClient::from_env()?;
//!
//! let request = PaymentData::new(
//!     1001,
//!     2000,
//!     "Order 1001",
//!     "https://shop.example/checkout/success",
//!     "https://shop.example/checkout/cancel",
//! );
//! let link = payos.create_payment_link(&request).await?;
//!
//! // Redirect the buyer to link.checkout_url
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use pay_payos::webhook::{dispatch_webhook_event, parse_webhook_body, WebhookHandler};
//!
//! struct Fulfillment;
//!
//! impl WebhookHandler for Fulfillment {
//!     fn on_payment_succeeded(&self, data: &WebhookData) -> PaymentResult<()> {
//!         println!("Order {} paid", data.order_code);
//!         Ok(())
//!     }
//! }
//!
//! // In your webhook endpoint:
//! let body = parse_webhook_body(&raw_body)?;
//! let data = payos.verify_payment_webhook_data(&body)?;
//! dispatch_webhook_event(&Fulfillment, &data)?;
//! ```

pub mod client;
pub mod config;
pub mod webhook;

// Re-exports
pub use client::PayOsClient;
pub use config::{PayOsConfig, PAYOS_BASE_URL};
pub use webhook::{
    dispatch_webhook_event, parse_webhook_body, verify_payment_webhook_data,
    LoggingWebhookHandler, WebhookHandler,
};
