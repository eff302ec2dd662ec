//! # payOS Webhook Handling
//!
//! payOS notifies the merchant's webhook URL with a body shaped like a
//! gateway response:
//!
//! ```json
//! { "code": "00", "desc": "success", "data": { ... }, "signature": "..." }
//! ```
//!
//! `data` must not be trusted until [`verify_payment_webhook_data`] has
//! recomputed its full-object signature under the checksum key.

use pay_core::signature::verify_signature;
use pay_core::{PaymentError, PaymentResult, WebhookData, WebhookEventType};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Authenticate a webhook body and decode its `data`.
///
/// - empty body, or missing/empty `data`: `NoData`
/// - missing/empty `signature`: `NoSignature`
/// - `signature` that is not a string: `InvalidSignature`
/// - signature mismatch: `DataIntegrity`
pub fn verify_payment_webhook_data(checksum_key: &str, body: &Value) -> PaymentResult<WebhookData> {
    let body = match body {
        Value::Object(fields) if !fields.is_empty() => fields,
        _ => return Err(PaymentError::NoData),
    };

    let signature = match body.get("signature") {
        None | Some(Value::Null) => return Err(PaymentError::NoSignature),
        Some(Value::String(s)) if s.is_empty() => return Err(PaymentError::NoSignature),
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(PaymentError::InvalidSignature),
    };

    let data = match body.get("data") {
        Some(Value::Object(data)) if !data.is_empty() => data,
        _ => return Err(PaymentError::NoData),
    };

    if !verify_signature(checksum_key, data, signature) {
        warn!("Webhook signature mismatch");
        return Err(PaymentError::DataIntegrity);
    }

    let verified = serde_json::from_value(Value::Object(data.clone())).map_err(|e| {
        PaymentError::Serialization(format!("Failed to decode webhook data: {}", e))
    })?;

    debug!("Verified payOS webhook");

    Ok(verified)
}

/// Parse a raw webhook request body into JSON
pub fn parse_webhook_body(payload: &[u8]) -> PaymentResult<Value> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Err(PaymentError::NoData);
    }
    serde_json::from_slice(payload)
        .map_err(|e| PaymentError::Serialization(format!("Failed to parse webhook: {}", e)))
}

/// Webhook event handler trait
///
/// Implement this trait to act on verified payment events.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// Called when a transfer settles an order (code "00")
    fn on_payment_succeeded(&self, data: &WebhookData) -> PaymentResult<()> {
        info!(
            "Payment received: order={}, amount={}, reference={}",
            data.order_code, data.amount, data.reference
        );
        Ok(())
    }

    /// Called for any other result code
    fn on_payment_failed(&self, data: &WebhookData, code: &str) -> PaymentResult<()> {
        warn!(
            "Payment failed: order={}, code={}, desc={}",
            data.order_code, code, data.desc
        );
        Ok(())
    }
}

/// Default no-op webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a verified webhook to the appropriate handler method
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, data: &WebhookData) -> PaymentResult<()> {
    match data.event_type() {
        WebhookEventType::PaymentSucceeded => handler.on_payment_succeeded(data),
        WebhookEventType::PaymentFailed(code) => handler.on_payment_failed(data, &code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::signature::create_signature_from_obj;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    const KEY: &str = "your_checksum_key";
    const SIGNATURE: &str = "01dd8c348f2ad33652bf111261f80aa4c41b38d2ce48be31306c2c259616dbc0";

    fn webhook_data() -> Value {
        json!({
            "orderCode": 123,
            "amount": 3000,
            "description": "VQRIO123",
            "accountNumber": "12345678",
            "reference": "TF230204212323",
            "transactionDateTime": "2023-02-04 18:25:00",
            "currency": "VND",
            "paymentLinkId": "124c33293c43417ab7879e14c8d9eb18",
            "code": "00",
            "desc": "Thành công",
            "counterAccountBankId": "",
            "counterAccountBankName": "",
            "counterAccountName": "",
            "counterAccountNumber": "",
            "virtualAccountName": "",
            "virtualAccountNumber": ""
        })
    }

    fn webhook_body() -> Value {
        json!({
            "code": "00",
            "desc": "success",
            "data": webhook_data(),
            "signature": SIGNATURE
        })
    }

    #[test]
    fn test_verify_known_webhook() {
        let data = verify_payment_webhook_data(KEY, &webhook_body()).unwrap();

        assert_eq!(data.order_code, 123);
        assert_eq!(data.amount, 3000);
        assert_eq!(data.reference, "TF230204212323");
        assert_eq!(data.desc, "Thành công");
        assert!(data.is_paid());
    }

    #[test]
    fn test_missing_signature() {
        let mut body = webhook_body();
        body.as_object_mut().unwrap().remove("signature");
        assert!(matches!(
            verify_payment_webhook_data(KEY, &body),
            Err(PaymentError::NoSignature)
        ));

        body["signature"] = json!(42);
        assert!(matches!(
            verify_payment_webhook_data(KEY, &body),
            Err(PaymentError::InvalidSignature)
        ));
    }

    #[test]
    fn test_missing_data() {
        let mut body = webhook_body();
        body.as_object_mut().unwrap().remove("data");
        assert!(matches!(
            verify_payment_webhook_data(KEY, &body),
            Err(PaymentError::NoData)
        ));
    }

    #[test]
    fn test_empty_body() {
        assert!(matches!(
            verify_payment_webhook_data(KEY, &json!({})),
            Err(PaymentError::NoData)
        ));
        assert!(matches!(
            verify_payment_webhook_data(KEY, &Value::Null),
            Err(PaymentError::NoData)
        ));
        assert!(matches!(parse_webhook_body(b"  "), Err(PaymentError::NoData)));
    }

    #[test]
    fn test_tampered_data_rejected() {
        let mut body = webhook_body();
        body["data"]["description"] = json!("VQRIO124");

        assert!(matches!(
            verify_payment_webhook_data(KEY, &body),
            Err(PaymentError::DataIntegrity)
        ));
        assert!(matches!(
            verify_payment_webhook_data("wrong_key", &webhook_body()),
            Err(PaymentError::DataIntegrity)
        ));
    }

    #[test]
    fn test_parse_raw_body() {
        let raw = serde_json::to_vec(&webhook_body()).unwrap();
        let body = parse_webhook_body(&raw).unwrap();
        assert!(verify_payment_webhook_data(KEY, &body).is_ok());

        assert!(matches!(
            parse_webhook_body(b"{not json"),
            Err(PaymentError::Serialization(_))
        ));
    }

    #[test]
    fn test_dispatch_webhook() {
        struct TestHandler {
            failed: AtomicBool,
        }

        impl WebhookHandler for TestHandler {
            fn on_payment_failed(&self, _data: &WebhookData, code: &str) -> PaymentResult<()> {
                assert_eq!(code, "07");
                self.failed.store(true, Ordering::SeqCst);
                Ok(())
            }
        }

        let handler = TestHandler {
            failed: AtomicBool::new(false),
        };

        let mut data = webhook_data();
        data["code"] = json!("07");
        let signature = create_signature_from_obj(KEY, data.as_object().unwrap());
        let body = json!({ "code": "00", "desc": "success", "data": data, "signature": signature });

        let verified = verify_payment_webhook_data(KEY, &body).unwrap();
        dispatch_webhook_event(&handler, &verified).unwrap();

        assert!(handler.failed.load(Ordering::SeqCst));
        dispatch_webhook_event(&LoggingWebhookHandler, &verified).unwrap();
    }
}
