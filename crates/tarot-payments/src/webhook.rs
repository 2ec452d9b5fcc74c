//! Stripe Webhook Handling
//!
//! Verifies the `stripe-signature` header and turns raw events into
//! [`WebhookEvent`]s.
//!
//! The header looks like `t=1700000000,v1=5257a8...,v0=...`. The signed
//! payload is `"{t}.{raw body}"`, HMAC-SHA256 keyed with the endpoint's
//! signing secret. Verification is `stripe::Webhook`'s, including its fixed
//! 300 second timestamp window.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stripe::{Webhook, WebhookError};

use crate::config::StripeConfig;
use crate::error::{PaymentError, Result};

/// Raw Stripe event envelope
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StripeEvent {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub data: EventData,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub object: Value,
}

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Checkout completed - user paid
    CheckoutCompleted {
        session_id: String,
        user_id: Option<String>,
    },

    /// Payment intent succeeded
    PaymentSucceeded { payment_intent_id: String },

    /// Payment intent failed
    PaymentFailed {
        payment_intent_id: String,
        failure_message: Option<String>,
    },

    /// Unhandled event type
    Unhandled { event_type: String },
}

/// Webhook handler
pub struct WebhookHandler {
    secret: Option<String>,
}

impl WebhookHandler {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    pub fn from_config(config: &StripeConfig) -> Self {
        Self::new(config.webhook_secret.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Verify webhook signature and parse event
    pub fn parse_event(&self, payload: &[u8], signature: &str) -> Result<StripeEvent> {
        self.verify(payload, signature, chrono::Utc::now().timestamp())?;
        parse_payload(payload)
    }

    /// Verify `signature` against `payload` as of `now` (unix seconds)
    pub fn verify(&self, payload: &[u8], signature: &str, now: i64) -> Result<()> {
        let secret = self.secret.as_deref().ok_or(PaymentError::WebhookNotConfigured)?;
        let payload = std::str::from_utf8(payload)
            .map_err(|_| PaymentError::WebhookSignature("payload is not UTF-8".into()))?;

        match Webhook::construct_event_with_timestamp(payload, signature, secret, now) {
            // The typed event model only covers a fixed set of objects; the
            // signature has already matched by the time BadParse comes back.
            Ok(_) | Err(WebhookError::BadParse(_)) => Ok(()),
            Err(e) => Err(PaymentError::WebhookSignature(e.to_string())),
        }
    }

    /// Process a webhook event
    ///
    /// Side effects are limited to logging; nothing is persisted.
    pub fn handle(&self, event: &StripeEvent) -> WebhookEvent {
        tracing::info!(
            event_type = %event.event_type,
            event_id = ?event.id,
            "Processing Stripe webhook"
        );

        let parsed = WebhookEvent::from(event);

        match &parsed {
            WebhookEvent::CheckoutCompleted { session_id, user_id } => {
                tracing::info!(
                    session_id = %session_id,
                    user_id = ?user_id,
                    "Checkout completed, user subscription should be upgraded"
                );
            }
            WebhookEvent::PaymentSucceeded { payment_intent_id } => {
                tracing::info!(payment_intent_id = %payment_intent_id, "Payment succeeded");
            }
            WebhookEvent::PaymentFailed {
                payment_intent_id,
                failure_message,
            } => {
                tracing::warn!(
                    payment_intent_id = %payment_intent_id,
                    reason = ?failure_message,
                    "Payment failed"
                );
            }
            WebhookEvent::Unhandled { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
            }
        }

        parsed
    }
}

/// Parse the raw body as a Stripe event
pub fn parse_payload(payload: &[u8]) -> Result<StripeEvent> {
    serde_json::from_slice(payload).map_err(|e| PaymentError::WebhookParse(e.to_string()))
}

impl From<&StripeEvent> for WebhookEvent {
    fn from(event: &StripeEvent) -> Self {
        let object = &event.data.object;
        let object_id = || str_at(object, "/id").unwrap_or_default();

        match event.event_type.as_str() {
            "checkout.session.completed" => WebhookEvent::CheckoutCompleted {
                session_id: object_id(),
                user_id: str_at(object, "/metadata/userId")
                    .or_else(|| str_at(object, "/client_reference_id")),
            },
            "payment_intent.succeeded" => WebhookEvent::PaymentSucceeded {
                payment_intent_id: object_id(),
            },
            "payment_intent.payment_failed" => WebhookEvent::PaymentFailed {
                payment_intent_id: object_id(),
                failure_message: str_at(object, "/last_payment_error/message"),
            },
            other => WebhookEvent::Unhandled {
                event_type: other.to_string(),
            },
        }
    }
}

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_string)
}
