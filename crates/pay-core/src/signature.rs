//! # Payload Signatures
//!
//! Canonical serialization and HMAC-SHA256 signing for payOS payloads.
//!
//! Two signing rules exist and both are part of the gateway protocol:
//!
//! - [`create_signature_from_obj`] signs a whole object. It is used to verify
//!   the `data` of every gateway response and every webhook body.
//! - [`create_signature_of_payment_request`] signs exactly five fields of an
//!   outbound payment request (`amount`, `cancelUrl`, `description`,
//!   `orderCode`, `returnUrl`). Items and extras are not covered.
//!
//! ## Canonical form
//!
//! ```text
//! {"orderCode": 7, "amount": 2000, "items": [{"quantity": 1, "name": "A"}]}
//!
//! amount=2000&items=[{"name":"A","quantity":1}]&orderCode=7
//! ```
//!
//! Keys are sorted by byte order. `null`, `"null"` and `"undefined"` become
//! the empty string. Sequences (and nested records) are written as compact
//! JSON with record keys sorted and non-ASCII left as-is.

use crate::payment::PaymentData;
use hmac::{Hmac, Mac};
use serde_json::{Map, Number, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// String values the gateway treats as "no value"
const EMPTY_SENTINELS: &[&str] = &["undefined", "null"];

/// Build the canonical `key=value&...` string for a payload.
pub fn canonicalize(payload: &Map<String, Value>) -> String {
    let mut fields: Vec<(&String, &Value)> = payload.iter().collect();
    fields.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    fields
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, canonical_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Textual form of a single top-level value.
fn canonical_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) if EMPTY_SENTINELS.contains(&s.as_str()) => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => natural_number(n).to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => sorted_json(value),
    }
}

/// Compact JSON with every record's keys in byte order.
fn sorted_json(value: &Value) -> String {
    // Display for Value is compact and never escapes non-ASCII.
    sort_records(value).to_string()
}

/// Rebuild a value with object keys inserted in sorted order, so the output
/// is ordered whether or not serde_json preserves insertion order.
fn sort_records(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sort_records).collect()),
        Value::Object(record) => {
            let mut entries: Vec<(&String, &Value)> = record.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_records(v)))
                    .collect(),
            )
        }
        Value::Number(n) => Value::Number(natural_number(n)),
        other => other.clone(),
    }
}

/// Whole-valued floats print as integers (`2000.0` is `2000`), the way the
/// gateway's own JSON encoder writes them.
fn natural_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e18 => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

/// Lowercase hex HMAC-SHA256 of `message` under `checksum_key`.
pub fn hmac_sha256_hex(checksum_key: &str, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(checksum_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sign a whole object (full-object rule).
pub fn create_signature_from_obj(checksum_key: &str, payload: &Map<String, Value>) -> String {
    hmac_sha256_hex(checksum_key, &canonicalize(payload))
}

/// Recompute the full-object signature and compare it in constant time.
pub fn verify_signature(checksum_key: &str, payload: &Map<String, Value>, expected: &str) -> bool {
    let computed = create_signature_from_obj(checksum_key, payload);
    constant_time_eq(&computed, expected)
}

/// Canonical string of the five signed payment request fields.
///
/// Absent fields render as the empty string; callers validate presence
/// before signing.
pub fn payment_request_canonical(request: &PaymentData) -> String {
    fn text<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    format!(
        "amount={}&cancelUrl={}&description={}&orderCode={}&returnUrl={}",
        text(&request.amount),
        text(&request.cancel_url),
        text(&request.description),
        text(&request.order_code),
        text(&request.return_url),
    )
}

/// Sign an outbound payment request (five-field rule).
pub fn create_signature_of_payment_request(checksum_key: &str, request: &PaymentData) -> String {
    hmac_sha256_hex(checksum_key, &payment_request_canonical(request))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::ItemData;
    use serde_json::json;

    const KEY: &str = "your_checksum_key";

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn webhook_data() -> Map<String, Value> {
        object(json!({
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
        }))
    }

    #[test]
    fn test_canonical_sorts_keys() {
        let payload = object(json!({"orderCode": 7, "amount": 2000, "description": "x"}));
        assert_eq!(canonicalize(&payload), "amount=2000&description=x&orderCode=7");
    }

    #[test]
    fn test_known_webhook_signature() {
        assert_eq!(
            create_signature_from_obj(KEY, &webhook_data()),
            "01dd8c348f2ad33652bf111261f80aa4c41b38d2ce48be31306c2c259616dbc0"
        );
    }

    #[test]
    fn test_signature_ignores_field_order() {
        let forward = webhook_data();
        let mut reversed = Map::new();
        for (k, v) in forward.iter().rev() {
            reversed.insert(k.clone(), v.clone());
        }
        assert_eq!(
            create_signature_from_obj(KEY, &forward),
            create_signature_from_obj(KEY, &reversed)
        );
    }

    #[test]
    fn test_null_sentinels_canonicalize_empty() {
        for value in [Value::Null, json!("null"), json!("undefined"), json!("")] {
            let mut payload = Map::new();
            payload.insert("buyerName".into(), value);
            payload.insert("amount".into(), json!(10));
            assert_eq!(canonicalize(&payload), "amount=10&buyerName=");
        }
    }

    #[test]
    fn test_item_records_sorted_and_unescaped() {
        let payload = object(json!({
            "orderCode": 7,
            "amount": 2000,
            "items": [{"quantity": 1, "price": 2000, "name": "Mỳ tôm"}]
        }));

        let canonical = canonicalize(&payload);
        assert_eq!(
            canonical,
            r#"amount=2000&items=[{"name":"Mỳ tôm","price":2000,"quantity":1}]&orderCode=7"#
        );
        assert_eq!(
            create_signature_from_obj(KEY, &payload),
            "12ab5af285dbb6cd62d21338a060b97840e6024e677982bd4f8933d100ca97cf"
        );
    }

    #[test]
    fn test_numbers_keep_natural_form() {
        let payload = object(json!({"a": 1.5, "b": -3, "c": true}));
        assert_eq!(canonicalize(&payload), "a=1.5&b=-3&c=true");

        let payload: Map<String, Value> =
            serde_json::from_str(r#"{"orderCode": 7, "amount": 2000.0, "fee": -0.0}"#).unwrap();
        assert_eq!(canonicalize(&payload), "amount=2000&fee=0&orderCode=7");

        let payload = object(json!({"items": [{"price": 2000.0, "quantity": 1}]}));
        assert_eq!(canonicalize(&payload), r#"items=[{"price":2000,"quantity":1}]"#);
    }

    #[test]
    fn test_empty_payload_still_signed() {
        let empty = Map::new();
        assert_eq!(canonicalize(&empty), "");
        assert_eq!(
            create_signature_from_obj(KEY, &empty),
            "88191b1ff68480c0f1039c2055694404d9447091c078d96e2f8e9a30d3f149d3"
        );
    }

    #[test]
    fn test_verify_round_trip_and_tamper() {
        let data = webhook_data();
        let signature = create_signature_from_obj(KEY, &data);
        assert!(verify_signature(KEY, &data, &signature));
        assert!(!verify_signature("other_key", &data, &signature));

        let mut tampered = data.clone();
        tampered.insert("amount".into(), json!(3001));
        assert!(!verify_signature(KEY, &tampered, &signature));
        assert!(!verify_signature(KEY, &data, &signature[..63]));
    }

    #[test]
    fn test_payment_request_signature_fixture() {
        let request = PaymentData::new(
            123456,
            2000,
            "Thanh toan don hang",
            "https://example.com/return",
            "https://example.com/cancel",
        );

        assert_eq!(
            payment_request_canonical(&request),
            "amount=2000&cancelUrl=https://example.com/cancel&description=Thanh toan don hang&orderCode=123456&returnUrl=https://example.com/return"
        );
        assert_eq!(
            create_signature_of_payment_request(KEY, &request),
            "8bf07eff004f3b07c32b1699a0fac9a44f71023b1318f3ea265c4048c36a8abe"
        );
    }

    #[test]
    fn test_payment_request_signature_ignores_items_and_extras() {
        let plain = PaymentData::new(
            123456,
            2000,
            "Thanh toan don hang",
            "https://example.com/return",
            "https://example.com/cancel",
        );
        let decorated = plain
            .clone()
            .with_item(ItemData::new("Mỳ tôm", 1, 2000))
            .with_buyer_name("Nguyen Van A")
            .with_extra("note", json!("gift"));

        assert_eq!(
            create_signature_of_payment_request(KEY, &plain),
            create_signature_of_payment_request(KEY, &decorated)
        );
    }
}
