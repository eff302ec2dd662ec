//! # Request Handlers
//!
//! Axum request handlers for the merchant API.
//! Each handler is a thin adapter over one `PaymentGateway` operation.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;
use pay_core::{
    CreatePaymentResult, PaymentData, PaymentError, PaymentLinkId, PaymentLinkInformation,
};
use pay_payos::{dispatch_webhook_event, parse_webhook_body, LoggingWebhookHandler};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Cancel payment link request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPaymentLinkRequest {
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Confirm webhook request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmWebhookRequest {
    /// URL to register; defaults to this service's own webhook endpoint
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Confirm webhook response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmWebhookResponse {
    pub webhook_url: String,
}

/// Query parameters payOS appends to the return/cancel URLs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReturnParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub cancel: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_code: Option<i64>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    /// payOS-style error code, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, status: u16) -> Self {
        Self {
            error: error.into(),
            status,
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let status = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), status);
    if let Some(code) = err.code() {
        response = response.with_code(code);
    }
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Order code derived from the clock, for requests that don't bring one
fn generate_order_code() -> i64 {
    Utc::now().timestamp_millis()
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payos-merchant",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a payment link.
///
/// `orderCode`, `returnUrl` and `cancelUrl` are filled in when omitted;
/// everything else is validated by the gateway client.
#[instrument(skip(state, request), fields(order_code = ?request.order_code))]
pub async fn create_payment_link(
    State(state): State<AppState>,
    Json(mut request): Json<PaymentData>,
) -> Result<Json<CreatePaymentResult>, ApiError> {
    if request.order_code.is_none() {
        request.order_code = Some(generate_order_code());
    }
    if request.return_url.is_none() {
        request.return_url = Some(state.urls.return_url());
    }
    if request.cancel_url.is_none() {
        request.cancel_url = Some(state.urls.cancel_url());
    }

    let result = state
        .gateway
        .create_payment_link(&request)
        .await
        .map_err(|e| {
            error!("Failed to create payment link: {}", e);
            payment_error_to_response(e)
        })?;

    info!(
        "Created payment link: order={}, checkout_url={}",
        result.order_code, result.checkout_url
    );

    Ok(Json(result))
}

/// Get payment link information by order code or payment link id
pub async fn get_payment_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentLinkInformation>, ApiError> {
    let info = state
        .gateway
        .get_payment_link_information(PaymentLinkId::parse(&id))
        .await
        .map_err(payment_error_to_response)?;

    Ok(Json(info))
}

/// Cancel a payment link. The body is optional.
#[instrument(skip(state, body))]
pub async fn cancel_payment_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PaymentLinkInformation>, ApiError> {
    let request: CancelPaymentLinkRequest = if body.is_empty() {
        CancelPaymentLinkRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!("Invalid cancel request: {}", e), 400)),
            )
        })?
    };

    let info = state
        .gateway
        .cancel_payment_link(
            PaymentLinkId::parse(&id),
            request.cancellation_reason.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to cancel payment link {}: {}", id, e);
            payment_error_to_response(e)
        })?;

    info!("Cancelled payment link: {}", info.id);

    Ok(Json(info))
}

/// Register a webhook URL with payOS
pub async fn confirm_webhook(
    State(state): State<AppState>,
    Json(request): Json<ConfirmWebhookRequest>,
) -> Result<Json<ConfirmWebhookResponse>, ApiError> {
    let webhook_url = request
        .webhook_url
        .unwrap_or_else(|| state.webhook_url());

    let webhook_url = state
        .gateway
        .confirm_webhook(&webhook_url)
        .await
        .map_err(|e| {
            error!("Webhook confirmation failed: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(ConfirmWebhookResponse { webhook_url }))
}

/// Handle a payOS webhook
#[instrument(skip(state, body))]
pub async fn payos_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = parse_webhook_body(&body).map_err(payment_error_to_response)?;

    let data = state
        .gateway
        .verify_payment_webhook_data(&payload)
        .map_err(|e| {
            warn!("Webhook verification failed: {}", e);
            payment_error_to_response(e)
        })?;

    info!(
        "Received webhook: order={}, code={}, link={}",
        data.order_code, data.code, data.payment_link_id
    );

    dispatch_webhook_event(&LoggingWebhookHandler, &data).map_err(|e| {
        error!("Webhook handler error: {}", e);
        payment_error_to_response(e)
    })?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Return page after payment
pub async fn checkout_success(Query(params): Query<CheckoutReturnParams>) -> impl IntoResponse {
    let order = params
        .order_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let status = params.status.unwrap_or_else(|| "UNKNOWN".to_string());

    Html(format!(
        r#"
<!DOCTYPE html>
<html>
<head><title>Payment Received</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; text-align: center;">
        <h1>Thank you!</h1>
        <p>Order: <code>{}</code></p>
        <p style="color: #666;">Status: {}</p>
    </div>
</body>
</html>
"#,
        html_escape(&order),
        html_escape(&status)
    ))
}

/// Cancel page
pub async fn checkout_cancel(Query(params): Query<CheckoutReturnParams>) -> impl IntoResponse {
    let order = params
        .order_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Html(format!(
        r#"
<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; text-align: center;">
        <h1>Payment Cancelled</h1>
        <p>Order: <code>{}</code></p>
        <p style="color: #666;">No charges were made.</p>
    </div>
</body>
</html>
"#,
        html_escape(&order)
    ))
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
