//! # Payment Types
//!
//! Payment request, payment link and webhook types for the payOS API.
//! Field names follow the gateway's camelCase JSON.

use crate::error::{PaymentError, PaymentResult};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A line item shown on the hosted payment page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    /// Item name
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price in the smallest currency unit
    pub price: i64,
}

impl ItemData {
    pub fn new(name: impl Into<String>, quantity: u32, price: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Calculate the total price for this item
    pub fn total(&self) -> i64 {
        self.price * self.quantity as i64
    }
}

/// A request to create a payment link.
///
/// The five signed fields are optional at the type level so an incomplete
/// request can be reported field by field; see [`PaymentData::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    /// Merchant order code (non-negative, unique per merchant)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_code: Option<i64>,

    /// Amount in the smallest currency unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Payment description (shown to the buyer and on the transfer)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Redirect target after a successful payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,

    /// Redirect target when the buyer cancels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemData>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_address: Option<String>,

    /// Link expiry as a unix timestamp (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,

    /// Any other fields, sent to the gateway unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentData {
    /// Create a payment request with all required fields set
    pub fn new(
        order_code: i64,
        amount: i64,
        description: impl Into<String>,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            order_code: Some(order_code),
            amount: Some(amount),
            description: Some(description.into()),
            return_url: Some(return_url.into()),
            cancel_url: Some(cancel_url.into()),
            ..Self::default()
        }
    }

    /// Add a line item
    pub fn with_item(mut self, item: ItemData) -> Self {
        self.items.get_or_insert_with(Vec::new).push(item);
        self
    }

    pub fn with_buyer_name(mut self, name: impl Into<String>) -> Self {
        self.buyer_name = Some(name.into());
        self
    }

    pub fn with_buyer_email(mut self, email: impl Into<String>) -> Self {
        self.buyer_email = Some(email.into());
        self
    }

    pub fn with_buyer_phone(mut self, phone: impl Into<String>) -> Self {
        self.buyer_phone = Some(phone.into());
        self
    }

    pub fn with_buyer_address(mut self, address: impl Into<String>) -> Self {
        self.buyer_address = Some(address.into());
        self
    }

    /// Set an absolute expiry (unix seconds)
    pub fn with_expired_at(mut self, timestamp: i64) -> Self {
        self.expired_at = Some(timestamp);
        self
    }

    /// Expire the link `ttl` from now
    pub fn expires_in(self, ttl: Duration) -> Self {
        let timestamp = (Utc::now() + ttl).timestamp();
        self.with_expired_at(timestamp)
    }

    /// Add an extra field passed through to the gateway
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Names of required fields that are absent, in the gateway's order
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let present = [
            ("orderCode", self.order_code.is_some()),
            ("amount", self.amount.is_some()),
            ("returnUrl", self.return_url.is_some()),
            ("cancelUrl", self.cancel_url.is_some()),
            ("description", self.description.is_some()),
        ];

        present
            .into_iter()
            .filter(|(_, is_set)| !is_set)
            .map(|(name, _)| name)
            .collect()
    }

    /// Check the request can be signed and sent.
    ///
    /// Missing fields are reported first, all at once. A present but
    /// out-of-range order code or amount is reported afterwards.
    pub fn validate(&self) -> PaymentResult<()> {
        let missing = self.missing_required_fields();
        if !missing.is_empty() {
            return Err(PaymentError::invalid_parameter(missing));
        }

        let mut invalid = Vec::new();
        if self.order_code.is_some_and(|code| code < 0) {
            invalid.push("orderCode");
        }
        if self.amount.is_some_and(|amount| amount <= 0) {
            invalid.push("amount");
        }
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(PaymentError::invalid_parameter(invalid))
        }
    }

    /// Sum of the line items, if any were given
    pub fn items_total(&self) -> Option<i64> {
        self.items
            .as_ref()
            .map(|items| items.iter().map(ItemData::total).sum())
    }
}

/// Identifies a payment link: by the merchant's order code or by the
/// gateway-assigned payment link id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentLinkId {
    OrderCode(i64),
    LinkId(String),
}

impl PaymentLinkId {
    /// Parse a path segment: an integer in plain form (optional `-`, digits,
    /// no leading zeros) is an order code, anything else a link id. Segments
    /// like `007` or `+5` stay link ids so they reach the gateway unchanged.
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(code) if code.to_string() == segment => PaymentLinkId::OrderCode(code),
            _ => PaymentLinkId::LinkId(segment.to_string()),
        }
    }

    /// Non-negative order code or non-empty link id
    pub fn validate(&self) -> PaymentResult<()> {
        let valid = match self {
            PaymentLinkId::OrderCode(code) => *code >= 0,
            PaymentLinkId::LinkId(id) => !id.trim().is_empty(),
        };
        if valid {
            Ok(())
        } else {
            Err(PaymentError::invalid_parameter(Vec::<String>::new()))
        }
    }
}

impl fmt::Display for PaymentLinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentLinkId::OrderCode(code) => write!(f, "{}", code),
            PaymentLinkId::LinkId(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PaymentLinkId {
    fn from(code: i64) -> Self {
        PaymentLinkId::OrderCode(code)
    }
}

impl From<&str> for PaymentLinkId {
    fn from(id: &str) -> Self {
        PaymentLinkId::LinkId(id.to_string())
    }
}

impl From<String> for PaymentLinkId {
    fn from(id: String) -> Self {
        PaymentLinkId::LinkId(id)
    }
}

/// The envelope every gateway response uses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// "00" on success, an error code otherwise
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub desc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl GatewayResponse {
    /// Result code the gateway uses for success
    pub const SUCCESS_CODE: &'static str = "00";

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS_CODE
    }
}

/// Data returned after creating a payment link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResult {
    #[serde(default)]
    pub bin: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_name: String,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    pub order_code: i64,
    #[serde(default)]
    pub currency: String,
    pub payment_link_id: String,
    #[serde(default)]
    pub status: PaymentLinkStatus,
    /// Hosted payment page (redirect the buyer here)
    pub checkout_url: String,
    /// VietQR payload for the transfer
    #[serde(default)]
    pub qr_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,
}

/// Lifecycle state of a payment link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentLinkStatus {
    /// Created, awaiting payment
    #[default]
    Pending,
    /// Partially paid / being processed
    Processing,
    /// Paid in full
    Paid,
    /// Cancelled by the merchant
    Cancelled,
    /// Expired before payment
    Expired,
    /// Status this SDK does not know about yet
    #[serde(other)]
    Unknown,
}

/// A bank transfer recorded against a payment link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub reference: String,
    pub amount: i64,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transaction_date_time: String,
    #[serde(default)]
    pub virtual_account_name: Option<String>,
    #[serde(default)]
    pub virtual_account_number: Option<String>,
    #[serde(default)]
    pub counter_account_bank_id: Option<String>,
    #[serde(default)]
    pub counter_account_bank_name: Option<String>,
    #[serde(default)]
    pub counter_account_name: Option<String>,
    #[serde(default)]
    pub counter_account_number: Option<String>,
}

/// Current state of a payment link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkInformation {
    pub id: String,
    pub order_code: i64,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_remaining: i64,
    #[serde(default)]
    pub status: PaymentLinkStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub canceled_at: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl PaymentLinkInformation {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentLinkStatus::Paid
    }
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// Transfer matched the order (code "00")
    PaymentSucceeded,
    /// Any other result code
    PaymentFailed(String),
}

/// The verified `data` of a payment webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    pub order_code: i64,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub transaction_date_time: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub payment_link_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub counter_account_bank_id: Option<String>,
    #[serde(default)]
    pub counter_account_bank_name: Option<String>,
    #[serde(default)]
    pub counter_account_name: Option<String>,
    #[serde(default)]
    pub counter_account_number: Option<String>,
    #[serde(default)]
    pub virtual_account_name: Option<String>,
    #[serde(default)]
    pub virtual_account_number: Option<String>,
}

impl WebhookData {
    pub fn event_type(&self) -> WebhookEventType {
        if self.code == GatewayResponse::SUCCESS_CODE {
            WebhookEventType::PaymentSucceeded
        } else {
            WebhookEventType::PaymentFailed(self.code.clone())
        }
    }

    pub fn is_paid(&self) -> bool {
        self.event_type() == WebhookEventType::PaymentSucceeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> PaymentData {
        PaymentData::new(
            1001,
            2000,
            "Thanh toán đơn hàng",
            "https://shop.example/return",
            "https://shop.example/cancel",
        )
    }

    #[test]
    fn test_missing_required_fields_are_listed_exactly() {
        let request = PaymentData {
            amount: Some(2000),
            description: Some("x".into()),
            ..PaymentData::default()
        };

        assert_eq!(
            request.missing_required_fields(),
            vec!["orderCode", "returnUrl", "cancelUrl"]
        );

        match request.validate() {
            Err(PaymentError::InvalidParameter { fields }) => {
                assert_eq!(fields, vec!["orderCode", "returnUrl", "cancelUrl"]);
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut request = sample_request();
        request.amount = Some(0);
        request.order_code = Some(-1);

        match request.validate() {
            Err(PaymentError::InvalidParameter { fields }) => {
                assert_eq!(fields, vec!["orderCode", "amount"]);
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_serializes_camel_case_without_nulls() {
        let request = sample_request()
            .with_item(ItemData::new("Mỳ tôm", 2, 1000))
            .with_extra("note", json!("gift"));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["orderCode"], json!(1001));
        assert_eq!(value["returnUrl"], json!("https://shop.example/return"));
        assert_eq!(value["items"][0]["quantity"], json!(2));
        assert_eq!(value["note"], json!("gift"));
        assert!(value.get("buyerName").is_none());
        assert_eq!(request.items_total(), Some(2000));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields_as_extra() {
        let request: PaymentData = serde_json::from_value(json!({
            "orderCode": 5,
            "amount": 1000,
            "description": "d",
            "returnUrl": "r",
            "cancelUrl": "c",
            "campaign": "tet"
        }))
        .unwrap();

        assert_eq!(request.order_code, Some(5));
        assert_eq!(request.extra.get("campaign"), Some(&json!("tet")));
    }

    #[test]
    fn test_expires_in_sets_future_timestamp() {
        let request = sample_request().expires_in(Duration::minutes(15));
        let expired_at = request.expired_at.unwrap();
        assert!(expired_at > Utc::now().timestamp());
    }

    #[test]
    fn test_payment_link_id() {
        assert_eq!(PaymentLinkId::parse("123"), PaymentLinkId::OrderCode(123));
        assert_eq!(
            PaymentLinkId::parse("124c33293c43417ab7879e14c8d9eb18"),
            PaymentLinkId::LinkId("124c33293c43417ab7879e14c8d9eb18".into())
        );
        assert_eq!(PaymentLinkId::parse("-4"), PaymentLinkId::OrderCode(-4));
        assert_eq!(PaymentLinkId::parse("007"), PaymentLinkId::LinkId("007".into()));
        assert_eq!(PaymentLinkId::parse("+5"), PaymentLinkId::LinkId("+5".into()));
        assert_eq!(PaymentLinkId::parse("007").to_string(), "007");

        assert!(PaymentLinkId::from(0).validate().is_ok());
        assert!(PaymentLinkId::from(-5).validate().is_err());
        assert!(PaymentLinkId::from("").validate().is_err());
        assert_eq!(PaymentLinkId::from(42).to_string(), "42");
    }

    #[test]
    fn test_unknown_status_falls_back() {
        let status: PaymentLinkStatus = serde_json::from_value(json!("UNDERPAID")).unwrap();
        assert_eq!(status, PaymentLinkStatus::Unknown);
        let status: PaymentLinkStatus = serde_json::from_value(json!("PAID")).unwrap();
        assert_eq!(status, PaymentLinkStatus::Paid);
    }

    #[test]
    fn test_webhook_event_type() {
        let data: WebhookData = serde_json::from_value(json!({
            "orderCode": 123,
            "amount": 3000,
            "description": "VQRIO123",
            "code": "00",
            "desc": "Thành công",
            "counterAccountName": null
        }))
        .unwrap();

        assert_eq!(data.event_type(), WebhookEventType::PaymentSucceeded);
        assert!(data.is_paid());
        assert_eq!(data.counter_account_name, None);

        let failed = WebhookData {
            code: "01".into(),
            ..data
        };
        assert_eq!(
            failed.event_type(),
            WebhookEventType::PaymentFailed("01".into())
        );
    }
}
