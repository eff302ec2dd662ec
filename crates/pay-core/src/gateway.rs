//! # Payment Gateway Trait
//!
//! The operations a merchant backend needs from the payOS gateway.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── create_payment_link()                                  │
//! │  ├── get_payment_link_information()                         │
//! │  ├── cancel_payment_link()                                  │
//! │  ├── confirm_webhook()                                      │
//! │  └── verify_payment_webhook_data()                          │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                 ┌──────────┴──────────┐
//!                 │                     │
//!         ┌───────┴───────┐     ┌───────┴───────┐
//!         │  PayOsClient  │     │  test fakes   │
//!         └───────────────┘     └───────────────┘
//! ```
//!
//! Each network operation performs exactly one gateway call. Webhook
//! verification performs none.

use crate::error::PaymentResult;
use crate::payment::{
    CreatePaymentResult, PaymentData, PaymentLinkId, PaymentLinkInformation, WebhookData,
};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted payment link for an order.
    ///
    /// Fails with `InvalidParameter` before any I/O if a required field is
    /// missing. The returned data has already been signature-checked.
    async fn create_payment_link(&self, request: &PaymentData) -> PaymentResult<CreatePaymentResult>;

    /// Fetch the current state of a payment link.
    async fn get_payment_link_information(
        &self,
        id: PaymentLinkId,
    ) -> PaymentResult<PaymentLinkInformation>;

    /// Cancel a payment link, optionally recording a reason.
    async fn cancel_payment_link(
        &self,
        id: PaymentLinkId,
        cancellation_reason: Option<&str>,
    ) -> PaymentResult<PaymentLinkInformation>;

    /// Register (and have the gateway validate) the merchant's webhook URL.
    ///
    /// Returns the URL unchanged on success.
    async fn confirm_webhook(&self, webhook_url: &str) -> PaymentResult<String>;

    /// Authenticate a webhook body and return its `data`.
    ///
    /// This is the trust boundary for inbound payment events.
    fn verify_payment_webhook_data(&self, body: &serde_json::Value) -> PaymentResult<WebhookData>;

    /// Gateway name (for logging and routing)
    fn provider_name(&self) -> &'static str {
        "payos"
    }

    /// Webhook endpoint path for this gateway.
    /// Default: `/webhook/{provider_name}`
    fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.provider_name())
    }
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Landing pages the gateway redirects the buyer to
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the merchant application (e.g., "https://shop.example")
    pub base_url: String,
    /// Return page path (e.g., "/checkout/success")
    pub success_path: String,
    /// Cancel page path (e.g., "/checkout/cancel")
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            success_path: "/checkout/success".to_string(),
            cancel_path: "/checkout/cancel".to_string(),
        }
    }

    pub fn return_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
