//! # payOS Client
//!
//! Implementation of the payOS merchant API (`/v2/payment-requests`,
//! `/confirm-webhook`).
//!
//! Outbound payment requests are signed with the five-field rule. Every
//! successful response carries `data` plus a `signature` computed with the
//! full-object rule, and is rejected unless that signature checks out.

use crate::config::PayOsConfig;
use crate::webhook;
use async_trait::async_trait;
use pay_core::signature::{create_signature_of_payment_request, verify_signature};
use pay_core::{
    CreatePaymentResult, GatewayResponse, PaymentData, PaymentError, PaymentGateway,
    PaymentLinkId, PaymentLinkInformation, PaymentResult, WebhookData,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument, warn};

/// payOS gateway client
///
/// Holds the merchant credentials and an HTTP client. Cheap to share across
/// tasks; no per-call state is kept.
pub struct PayOsClient {
    config: PayOsConfig,
    client: Client,
}

impl PayOsClient {
    /// Create a new payOS client
    pub fn new(config: PayOsConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = PayOsConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &PayOsConfig {
        &self.config
    }

    /// Build an endpoint URL, escaping each path segment
    fn endpoint(&self, segments: &[&str]) -> PaymentResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            PaymentError::Configuration(format!(
                "Invalid API base URL {}: {}",
                self.config.api_base_url, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::Configuration(format!(
                    "API base URL cannot take a path: {}",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Start a request carrying the merchant headers every endpoint expects
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("x-client-id", &self.config.client_id)
            .header("x-api-key", &self.config.api_key)
            .header(CONTENT_TYPE, "application/json");

        match &self.config.partner_code {
            Some(code) => builder.header("x-partner-code", code),
            None => builder,
        }
    }

    /// Send a request, returning the status and raw body
    async fn send(&self, builder: RequestBuilder) -> PaymentResult<(StatusCode, String)> {
        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        Ok((status, body))
    }

    /// Send a request to an enveloped endpoint and return its verified data
    async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PaymentResult<T> {
        let (status, body) = self.send(builder).await?;

        let envelope: GatewayResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unreadable payOS response: status={}, body={}", status, body);
            PaymentError::Serialization(format!(
                "Failed to parse payOS response (HTTP {}): {}",
                status, e
            ))
        })?;

        open_envelope(&self.config.checksum_key, envelope)
    }
}

/// Check a gateway response and decode its `data`.
///
/// A non-"00" code is passed through as `Gateway`. On "00" the data must be
/// an object whose full-object signature matches `signature`.
pub fn open_envelope<T: DeserializeOwned>(
    checksum_key: &str,
    response: GatewayResponse,
) -> PaymentResult<T> {
    if !response.is_success() {
        error!("payOS error: code={}, desc={}", response.code, response.desc);
        return Err(PaymentError::Gateway {
            code: response.code,
            desc: response.desc,
        });
    }

    let data = match response.data {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => Map::new(),
        Some(_) => {
            warn!("payOS response data is not an object");
            return Err(PaymentError::DataIntegrity);
        }
    };

    let signature = response.signature.as_deref().unwrap_or_default();
    if !verify_signature(checksum_key, &data, signature) {
        warn!("payOS response signature mismatch");
        return Err(PaymentError::DataIntegrity);
    }

    if data.is_empty() {
        return Err(PaymentError::Gateway {
            code: response.code,
            desc: response.desc,
        });
    }

    serde_json::from_value(Value::Object(data)).map_err(|e| {
        PaymentError::Serialization(format!("Failed to decode payOS data: {}", e))
    })
}

#[async_trait]
impl PaymentGateway for PayOsClient {
    #[instrument(skip(self, request), fields(order_code = ?request.order_code))]
    async fn create_payment_link(
        &self,
        request: &PaymentData,
    ) -> PaymentResult<CreatePaymentResult> {
        request.validate()?;

        let signature = create_signature_of_payment_request(&self.config.checksum_key, request);

        let mut body = serde_json::to_value(request)
            .map_err(|e| PaymentError::Serialization(e.to_string()))?;
        if let Value::Object(fields) = &mut body {
            fields.insert("signature".to_string(), Value::String(signature));
        }

        debug!(
            "Creating payOS payment link: amount={:?}, items={}",
            request.amount,
            request.items.as_ref().map_or(0, Vec::len)
        );

        let url = self.endpoint(&["v2", "payment-requests"])?;
        let result: CreatePaymentResult =
            self.call(self.request(Method::POST, url).json(&body)).await?;

        info!(
            "Created payOS payment link: id={}, url={}",
            result.payment_link_id, result.checkout_url
        );

        Ok(result)
    }

    #[instrument(skip(self, id), fields(link = %id))]
    async fn get_payment_link_information(
        &self,
        id: PaymentLinkId,
    ) -> PaymentResult<PaymentLinkInformation> {
        id.validate()?;

        let segment = id.to_string();
        let url = self.endpoint(&["v2", "payment-requests", &segment])?;
        let info: PaymentLinkInformation = self.call(self.request(Method::GET, url)).await?;

        debug!("payOS payment link {}: status={:?}", info.id, info.status);

        Ok(info)
    }

    #[instrument(skip(self, id, cancellation_reason), fields(link = %id))]
    async fn cancel_payment_link(
        &self,
        id: PaymentLinkId,
        cancellation_reason: Option<&str>,
    ) -> PaymentResult<PaymentLinkInformation> {
        id.validate()?;

        let segment = id.to_string();
        let url = self.endpoint(&["v2", "payment-requests", &segment, "cancel"])?;
        let body = json!({ "cancellationReason": cancellation_reason });

        let info: PaymentLinkInformation =
            self.call(self.request(Method::POST, url).json(&body)).await?;

        info!("Cancelled payOS payment link: id={}", info.id);

        Ok(info)
    }

    #[instrument(skip(self))]
    async fn confirm_webhook(&self, webhook_url: &str) -> PaymentResult<String> {
        if webhook_url.trim().is_empty() {
            return Err(PaymentError::invalid_parameter(["webhookUrl"]));
        }

        let url = self.endpoint(&["confirm-webhook"])?;
        let body = json!({ "webhookUrl": webhook_url });

        let (status, response_body) = self.send(self.request(Method::POST, url).json(&body)).await?;

        match status.as_u16() {
            400 => {
                warn!("payOS rejected webhook URL: {}", response_body);
                Err(PaymentError::WebhookUrlInvalid)
            }
            401 => Err(PaymentError::Unauthorized),
            500..=599 => {
                error!("payOS server error: status={}, body={}", status, response_body);
                Err(PaymentError::InternalServerError)
            }
            _ => {
                info!("Confirmed payOS webhook URL: {}", webhook_url);
                Ok(webhook_url.to_string())
            }
        }
    }

    fn verify_payment_webhook_data(&self, body: &Value) -> PaymentResult<WebhookData> {
        webhook::verify_payment_webhook_data(&self.config.checksum_key, body)
    }
}
