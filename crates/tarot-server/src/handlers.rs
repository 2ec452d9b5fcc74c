//! HTTP Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

use tarot_payments::{
    CheckoutRequest, CheckoutSession, PaymentError, SessionStatus, is_session_id,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub received: bool,
}

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub monthly: Option<String>,
    pub yearly: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StripeConfigResponse {
    pub publishable_key: Option<String>,
    pub prices: PricesResponse,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

/// Error envelope with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.body.details = Some(details);
        self
    }

    fn validation(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        Value::String(
                            e.message
                                .as_ref()
                                .map_or_else(|| e.code.to_string(), ToString::to_string),
                        )
                    })
                    .collect();
                (field.to_string(), Value::Array(messages))
            })
            .collect::<serde_json::Map<_, _>>();

        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            "Request validation failed",
        )
        .with_details(Value::Object(fields))
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut api_error = Self::new(status, err.error_code(), err.user_message());

        api_error.body.details = match &err {
            PaymentError::Gateway { details, .. } => Some(details.clone()),
            PaymentError::Http(_) | PaymentError::Decode(_) | PaymentError::Config(_) => {
                tracing::error!(error = %err, "Unexpected payment error");
                Some(json!({ "error": err.to_string() }))
            }
            _ => None,
        };

        api_error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.body,
        };
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create Stripe checkout session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CheckoutSession>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(rejection.status(), "INVALID_REQUEST", rejection.body_text())
    })?;

    request.validate().map_err(|e| {
        tracing::debug!(errors = %e, "Rejected checkout request");
        ApiError::validation(&e)
    })?;

    let session = state.gateway.create_checkout_session(&request).await?;

    Ok(ApiResponse::ok(session))
}

/// Payment status of a checkout session
pub async fn payment_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionStatus>>, ApiError> {
    if !is_session_id(&session_id) {
        tracing::debug!(session_id = %session_id, "Rejected session id");
        return Err(PaymentError::InvalidSessionId(session_id).into());
    }

    let status = state.gateway.retrieve_session(&session_id).await?;

    Ok(ApiResponse::ok(status))
}

/// Public pricing configuration
pub async fn stripe_config(
    State(state): State<AppState>,
) -> Json<ApiResponse<StripeConfigResponse>> {
    let prices = state.prices.clone();

    ApiResponse::ok(StripeConfigResponse {
        publishable_key: prices.publishable_key,
        prices: PricesResponse {
            monthly: prices.monthly,
            yearly: prices.yearly,
        },
    })
}

/// Stripe webhook handler
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    if !state.webhooks.is_configured() {
        tracing::error!("STRIPE_WEBHOOK_SECRET not configured");
        return Err(PaymentError::WebhookNotConfigured.into());
    }

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "MISSING_SIGNATURE",
                "Missing Stripe signature",
            )
        })?;

    let event = state.webhooks.parse_event(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Webhook rejected");
        ApiError::from(e)
    })?;

    state.webhooks.handle(&event);

    Ok(Json(WebhookAck {
        success: true,
        received: true,
    }))
}
