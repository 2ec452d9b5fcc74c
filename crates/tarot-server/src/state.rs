//! Application State

use std::sync::Arc;

use tarot_payments::{CheckoutGateway, PriceConfig, StripeClient, StripeConfig, WebhookHandler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout gateway (Stripe in production)
    pub gateway: Arc<dyn CheckoutGateway>,

    /// Webhook signature verifier and dispatcher
    pub webhooks: Arc<WebhookHandler>,

    /// Public price configuration for the pricing page
    pub prices: PriceConfig,
}

impl AppState {
    /// Build state from a validated Stripe configuration
    pub fn from_config(config: &StripeConfig) -> tarot_payments::Result<Self> {
        let client = StripeClient::new(config)?;

        Ok(Self {
            gateway: Arc::new(client),
            webhooks: Arc::new(WebhookHandler::from_config(config)),
            prices: config.prices.clone(),
        })
    }
}
