//! # payOS Configuration
//!
//! Merchant credentials for a payOS payment channel.
//! Secrets are loaded from environment variables.

use pay_core::PaymentError;
use std::env;
use std::fmt;

/// Production API endpoint
pub const PAYOS_BASE_URL: &str = "https://api-merchant.payos.vn";

/// payOS API configuration
#[derive(Clone)]
pub struct PayOsConfig {
    /// Client ID of the payment channel
    pub client_id: String,

    /// API key of the payment channel
    pub api_key: String,

    /// Checksum key used to sign and verify payloads
    pub checksum_key: String,

    /// Partner code (sent as `x-partner-code` when set)
    pub partner_code: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl PayOsConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYOS_CLIENT_ID`
    /// - `PAYOS_API_KEY`
    /// - `PAYOS_CHECKSUM_KEY`
    ///
    /// Optional: `PAYOS_PARTNER_CODE`, `PAYOS_API_BASE_URL`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let client_id = required_var("PAYOS_CLIENT_ID")?;
        let api_key = required_var("PAYOS_API_KEY")?;
        let checksum_key = required_var("PAYOS_CHECKSUM_KEY")?;

        let partner_code = optional_var("PAYOS_PARTNER_CODE");
        let api_base_url =
            optional_var("PAYOS_API_BASE_URL").unwrap_or_else(|| PAYOS_BASE_URL.to_string());

        Ok(Self {
            client_id,
            api_key,
            checksum_key,
            partner_code,
            api_base_url,
        })
    }

    /// Create config with explicit values
    pub fn new(
        client_id: impl Into<String>,
        api_key: impl Into<String>,
        checksum_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: api_key.into(),
            checksum_key: checksum_key.into(),
            partner_code: None,
            api_base_url: PAYOS_BASE_URL.to_string(),
        }
    }

    /// Builder: set partner code
    pub fn with_partner_code(mut self, code: impl Into<String>) -> Self {
        self.partner_code = Some(code.into());
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

fn required_var(name: &str) -> Result<String, PaymentError> {
    optional_var(name).ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for PayOsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayOsConfig")
            .field("client_id", &self.client_id)
            .field("api_key", &"<redacted>")
            .field("checksum_key", &"<redacted>")
            .field("partner_code", &self.partner_code)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
