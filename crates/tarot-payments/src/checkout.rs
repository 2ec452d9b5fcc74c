//! Stripe Checkout Integration
//!
//! Creates hosted Checkout Sessions for one-time payments and reads their
//! status back. Parameters are the `stripe` crate's `CreateCheckoutSession`,
//! form-encoded the way the SDK encodes them. Responses are read off the wire
//! so that Stripe's own error codes reach the caller untouched.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use stripe::{
    CheckoutSessionMode, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionPaymentMethodTypes, Metadata,
};
use validator::Validate;

use crate::config::StripeConfig;
use crate::error::{PaymentError, Result};

const DEFAULT_ERROR_CODE: &str = "STRIPE_API_ERROR";
const DEFAULT_ERROR_MESSAGE: &str = "Stripe API call failed";
const SESSION_ID_PREFIX: &str = "cs_";

/// Whether `id` looks like a Checkout Session id (`cs_` then `[A-Za-z0-9_]`)
pub fn is_session_id(id: &str) -> bool {
    id.strip_prefix(SESSION_ID_PREFIX).is_some_and(|rest| {
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

/// Checkout gateway (Strategy pattern)
///
/// `StripeClient` is the production implementation; handlers only see this trait.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Create a hosted checkout session
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// Look up an existing checkout session
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus>;
}

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Stripe price id, e.g. `price_1Sren7GVP93aj81Tr4d18z2S`
    #[serde(alias = "priceId")]
    pub price_id: String,

    /// Application user id, echoed back in webhooks
    #[serde(alias = "userId")]
    pub user_id: String,

    /// Customer email
    #[serde(alias = "userEmail")]
    #[validate(email(message = "must be a valid email address"))]
    pub user_email: String,

    /// URL to redirect after successful payment
    #[serde(alias = "successUrl")]
    pub success_url: String,

    /// URL to redirect if checkout is cancelled
    #[serde(alias = "cancelUrl")]
    pub cancel_url: String,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session id (`cs_...`)
    pub session_id: String,

    /// Hosted page to redirect the user to
    pub url: String,
}

/// Payment state of an existing session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub customer_email: Option<String>,
    pub user_id: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}

/// Stripe client wrapper
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: Url,
}

impl StripeClient {
    /// Create a client from validated configuration
    pub fn new(config: &StripeConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| PaymentError::Config(format!("invalid Stripe API base: {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(PaymentError::Config(format!(
                "invalid Stripe API base: {}",
                config.api_base
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            secret_key: config.secret_key.clone(),
            api_base,
        })
    }

    /// API URL with each segment percent-encoded onto the base path
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| PaymentError::Config("Stripe API base cannot hold a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Checkout parameters for a one-time card payment
    fn session_params(request: &CheckoutRequest) -> CreateCheckoutSession<'_> {
        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(request.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.customer_email = Some(&request.user_email);
        params.client_reference_id = Some(&request.user_id);
        params.metadata = Some(Metadata::from([
            ("userId".to_string(), request.user_id.clone()),
            ("userEmail".to_string(), request.user_email.clone()),
        ]));
        params
    }

    /// Send an authenticated request and return the decoded success body
    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.bearer_auth(&self.secret_key).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(gateway_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| PaymentError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CheckoutGateway for StripeClient {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        tracing::info!(
            user_id = %request.user_id,
            email = %request.user_email,
            price_id = %request.price_id,
            "Creating checkout session"
        );

        let form = serde_qs::to_string(&Self::session_params(request))
            .map_err(|e| PaymentError::Config(format!("failed to encode checkout params: {e}")))?;
        let builder = self
            .http
            .post(self.endpoint(&["v1", "checkout", "sessions"])?)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form);

        let body = self.send(builder).await.inspect_err(|e| {
            tracing::warn!(
                user_id = %request.user_id,
                error = %e,
                "Checkout session creation failed"
            );
        })?;

        let session_id = string_field(&body, "id")
            .ok_or_else(|| PaymentError::Decode("No session id returned".into()))?;
        let url = string_field(&body, "url")
            .ok_or_else(|| PaymentError::Decode("No checkout URL returned".into()))?;

        tracing::info!(
            session_id = %session_id,
            user_id = %request.user_id,
            "Checkout session created"
        );

        Ok(CheckoutSession { session_id, url })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus> {
        if !is_session_id(session_id) {
            return Err(PaymentError::InvalidSessionId(session_id.to_string()));
        }

        tracing::debug!(session_id = %session_id, "Retrieving checkout session");

        let url = self.endpoint(&["v1", "checkout", "sessions", session_id])?;
        let body = self.send(self.http.get(url)).await?;

        let customer_email = string_field(&body, "customer_email").or_else(|| {
            body.pointer("/customer_details/email")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        Ok(SessionStatus {
            session_id: string_field(&body, "id").unwrap_or_else(|| session_id.to_string()),
            status: string_field(&body, "status"),
            payment_status: string_field(&body, "payment_status"),
            customer_email,
            user_id: string_field(&body, "client_reference_id"),
            amount_total: body.get("amount_total").and_then(Value::as_i64),
            currency: string_field(&body, "currency"),
        })
    }
}

/// Map a non-success Stripe response onto a payment error
///
/// A JSON body becomes `PaymentError::Gateway` with Stripe's `error.code` and
/// `error.message` kept verbatim and the `error` object (or `{}`) as details.
/// Anything else is not a Stripe API answer and becomes `PaymentError::Decode`.
fn gateway_error(status: StatusCode, body: &str) -> PaymentError {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        tracing::error!(status = status.as_u16(), "Stripe returned a non-JSON error body");
        return PaymentError::Decode(format!("non-JSON error body with status {status}"));
    };
    let details = parsed.get("error").cloned().unwrap_or_else(|| json!({}));

    let code = details
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ERROR_CODE)
        .to_string();
    let message = details
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ERROR_MESSAGE)
        .to_string();

    tracing::error!(
        status = status.as_u16(),
        code = %code,
        message = %message,
        "Stripe API error"
    );

    PaymentError::Gateway {
        status: status.as_u16(),
        code,
        message,
        details,
    }
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
