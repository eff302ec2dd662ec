//! # Payment Error Types
//!
//! Typed error handling for the payOS SDK.
//! All gateway operations return `Result<T, PaymentError>`.
//!
//! The first block of variants mirrors the error codes used by the payOS
//! SDKs (`"20"`..`"26"`, `"401"`), so a merchant can report the same code
//! whichever client produced it.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Gateway reported a 5xx while confirming a webhook
    #[error("Internal Server Error.")]
    InternalServerError,

    /// Credentials rejected by the gateway
    #[error("Unauthorized.")]
    Unauthorized,

    /// Caller input missing or malformed. `fields` names the offending
    /// parameters, empty when the whole argument is invalid.
    #[error("Invalid Parameter.{}", describe_fields(.fields))]
    InvalidParameter { fields: Vec<String> },

    /// Webhook body carried no signature
    #[error("No signature.")]
    NoSignature,

    /// Webhook body (or its `data`) was empty
    #[error("No data.")]
    NoData,

    /// Signature could not be parsed
    #[error("Invalid signature.")]
    InvalidSignature,

    /// Recomputed signature does not match the one delivered with the data
    #[error("The data is unreliable because the signature of the response does not match the signature of the data")]
    DataIntegrity,

    /// Gateway refused the webhook URL
    #[error("Webhook URL invalid.")]
    WebhookUrlInvalid,

    /// Non-"00" business response, passed through from the gateway
    #[error("Gateway error [{code}]: {desc}")]
    Gateway { code: String, desc: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn describe_fields(fields: &[String]) -> String {
    if fields.is_empty() {
        String::new()
    } else {
        format!(" {} must not be null.", fields.join(", "))
    }
}

impl PaymentError {
    /// Invalid parameter error naming the given fields
    pub fn invalid_parameter<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PaymentError::InvalidParameter {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the payOS-style error code for this error.
    ///
    /// Gateway errors return the gateway's own code. Local transport,
    /// serialization and configuration failures have no payOS code.
    pub fn code(&self) -> Option<&str> {
        match self {
            PaymentError::InternalServerError => Some("20"),
            PaymentError::Unauthorized => Some("401"),
            PaymentError::InvalidParameter { .. } => Some("21"),
            PaymentError::NoSignature => Some("22"),
            PaymentError::NoData => Some("23"),
            PaymentError::InvalidSignature => Some("24"),
            PaymentError::DataIntegrity => Some("25"),
            PaymentError::WebhookUrlInvalid => Some("26"),
            PaymentError::Gateway { code, .. } => Some(code.as_str()),
            PaymentError::Network(_)
            | PaymentError::Serialization(_)
            | PaymentError::Configuration(_) => None,
        }
    }

    /// Returns true if the error means a payload failed authentication
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            PaymentError::NoSignature | PaymentError::InvalidSignature | PaymentError::DataIntegrity
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InternalServerError => 502,
            PaymentError::Unauthorized => 502,
            PaymentError::InvalidParameter { .. } => 400,
            PaymentError::NoSignature => 401,
            PaymentError::NoData => 400,
            PaymentError::InvalidSignature => 401,
            PaymentError::DataIntegrity => 401,
            PaymentError::WebhookUrlInvalid => 400,
            PaymentError::Gateway { .. } => 502,
            PaymentError::Network(_) => 503,
            PaymentError::Serialization(_) => 500,
            PaymentError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
