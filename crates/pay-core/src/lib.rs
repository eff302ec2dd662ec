//! # pay-core
//!
//! Core types for the payos-rs SDK.
//!
//! This crate provides:
//! - `PaymentGateway` trait implemented by the payOS client
//! - `PaymentData`, `ItemData` and the typed gateway results
//! - `signature`: canonical payload serialization and HMAC-SHA256 signing
//! - `PaymentError` for typed error handling
//!
//! Nothing here performs I/O.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{signature, PaymentData, ItemData};
//!
//! let request = PaymentData::new(1001, 2000, "Order 1001", return_url, cancel_url)
//!     .with_item(ItemData::new("Mỳ tôm", 1, 2000));
//!
//! let sig = signature::create_signature_of_payment_request(&checksum_key, &request);
//! ```

pub mod error;
pub mod gateway;
pub mod payment;
pub mod signature;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, CheckoutUrls, PaymentGateway};
pub use payment::{
    CreatePaymentResult, GatewayResponse, ItemData, PaymentData, PaymentLinkId,
    PaymentLinkInformation, PaymentLinkStatus, Transaction, WebhookData, WebhookEventType,
};
