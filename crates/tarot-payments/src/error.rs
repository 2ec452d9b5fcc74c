//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Invalid or missing configuration, detected at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stripe answered with a non-success status and an error object
    #[error("Stripe error ({status}): {code} - {message}")]
    Gateway {
        status: u16,
        code: String,
        message: String,
        details: serde_json::Value,
    },

    /// Transport failure talking to Stripe (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session id is not a `cs_` Checkout Session id
    #[error("Invalid checkout session id: {0:?}")]
    InvalidSessionId(String),

    /// Stripe's answer was not what we expected (missing fields, non-JSON body)
    #[error("Unexpected Stripe response: {0}")]
    Decode(String),

    /// Webhook secret missing from configuration
    #[error("Webhook signing secret not configured")]
    WebhookNotConfigured,

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),
}

impl PaymentError {
    /// HTTP status to report for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Gateway { status, .. } => *status,
            PaymentError::InvalidSessionId(_) | PaymentError::WebhookSignature(_) => 400,
            _ => 500,
        }
    }

    /// Stable error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            PaymentError::Gateway { code, .. } => code,
            PaymentError::InvalidSessionId(_) => "INVALID_SESSION_ID",
            PaymentError::WebhookNotConfigured => "WEBHOOK_NOT_CONFIGURED",
            PaymentError::WebhookSignature(_) => "INVALID_SIGNATURE",
            PaymentError::WebhookParse(_) => "WEBHOOK_PARSE_ERROR",
            PaymentError::Config(_) | PaymentError::Http(_) | PaymentError::Decode(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Gateway { message, .. } => message,
            PaymentError::InvalidSessionId(_) => "Session ID must be a cs_ Checkout Session id",
            PaymentError::WebhookNotConfigured => "Webhook is not configured.",
            PaymentError::WebhookSignature(_) => "Signature verification failed.",
            PaymentError::WebhookParse(_) => "Failed to process webhook event.",
            _ => "Internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_keeps_status_and_code() {
        let err = PaymentError::Gateway {
            status: 404,
            code: "resource_missing".into(),
            message: "No such price: 'price_123'".into(),
            details: serde_json::json!({"code": "resource_missing"}),
        };

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "resource_missing");
        assert_eq!(err.user_message(), "No such price: 'price_123'");
    }

    #[test]
    fn test_unexpected_errors_collapse_to_internal() {
        let err = PaymentError::Decode("missing url".into());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn test_invalid_session_id_is_client_error() {
        let err = PaymentError::InvalidSessionId("pi_123".into());
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_SESSION_ID");
        assert_eq!(err.user_message(), "Session ID must be a cs_ Checkout Session id");
    }
}
