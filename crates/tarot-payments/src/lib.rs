//! # tarot-payments
//!
//! Stripe payment plumbing for the tarot backend.
//!
//! ## Flow
//!
//! One-time purchases go through Stripe Checkout (Hosted):
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  Tarot Web  │────▶│  Stripe Hosted  │────▶│  Tarot Web  │
//! │  (pricing)  │     │  Checkout Page  │     │  (success)  │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//!                              │
//!                              ▼ signed webhook
//!                     ┌─────────────────┐
//!                     │  tarot-server   │
//!                     └─────────────────┘
//! ```
//!
//! - [`StripeClient`] creates sessions and reads their status. Stripe's own
//!   error codes and HTTP statuses are preserved in [`PaymentError::Gateway`].
//! - [`WebhookHandler`] verifies the `stripe-signature` header with
//!   `stripe::Webhook` before any event is parsed.
//!
//! Sessions are created without an idempotency key: two identical calls
//! produce two sessions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tarot_payments::{CheckoutGateway, CheckoutRequest, StripeClient, StripeConfig};
//!
//! let config = StripeConfig::from_env()?;
//! let client = StripeClient::new(&config)?;
//!
//! let session = client.create_checkout_session(&CheckoutRequest {
//!     price_id: "price_1Sren7GVP93aj81Tr4d18z2S".into(),
//!     user_id: "user-123".into(),
//!     user_email: "user@example.com".into(),
//!     success_url: "https://yoursite.com/?payment=success".into(),
//!     cancel_url: "https://yoursite.com/pricing".into(),
//! }).await?;
//!
//! // Redirect user to: session.url
//! ```

mod checkout;
mod config;
mod error;
mod webhook;

pub use checkout::{
    CheckoutGateway, CheckoutRequest, CheckoutSession, SessionStatus, StripeClient, is_session_id,
};
pub use config::{DEFAULT_API_BASE, PriceConfig, StripeConfig, validate_secret_key};
pub use error::{PaymentError, Result};
pub use webhook::{StripeEvent, WebhookEvent, WebhookHandler, parse_payload};
