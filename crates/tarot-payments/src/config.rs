//! Stripe Configuration
//!
//! Built once at startup and handed to the client and the webhook verifier.

use std::time::Duration;

use serde::Serialize;

use crate::error::{PaymentError, Result};

/// Default Stripe REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Outbound request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SECRET_KEY_PREFIXES: [&str; 4] = ["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

/// Stripe configuration
#[derive(Clone, Debug)]
pub struct StripeConfig {
    /// Secret API key (`sk_test_...` / `sk_live_...`)
    pub secret_key: String,

    /// Webhook signing secret; only the webhook endpoint needs it
    pub webhook_secret: Option<String>,

    /// REST API base URL
    pub api_base: String,

    /// Timeout applied to every Stripe request
    pub timeout: Duration,

    /// Values the frontend may read
    pub prices: PriceConfig,
}

/// Public pricing configuration served to the web client
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PriceConfig {
    pub publishable_key: Option<String>,
    pub monthly: Option<String>,
    pub yearly: Option<String>,
}

impl StripeConfig {
    /// Create a validated configuration with default endpoint and timeouts
    pub fn new(secret_key: impl Into<String>) -> Result<Self> {
        let secret_key = secret_key.into();
        validate_secret_key(&secret_key)?;

        Ok(Self {
            secret_key,
            webhook_secret: None,
            api_base: DEFAULT_API_BASE.into(),
            timeout: REQUEST_TIMEOUT,
            prices: PriceConfig::default(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        let mut config = Self::new(secret_key)?;
        config.webhook_secret = non_empty_var("STRIPE_WEBHOOK_SECRET");
        if let Some(api_base) = non_empty_var("STRIPE_API_BASE") {
            config.api_base = api_base;
        }
        config.prices = PriceConfig {
            publishable_key: non_empty_var("STRIPE_PUBLISHABLE_KEY"),
            monthly: non_empty_var("STRIPE_PRICE_MONTHLY"),
            yearly: non_empty_var("STRIPE_PRICE_YEARLY"),
        };

        Ok(config)
    }

    /// Set the webhook signing secret
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Point the client at another API base (mock servers, proxies)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the public pricing values
    #[must_use]
    pub fn with_prices(mut self, prices: PriceConfig) -> Self {
        self.prices = prices;
        self
    }
}

/// Reject empty, placeholder and wrongly prefixed secret keys
pub fn validate_secret_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(PaymentError::Config("STRIPE_SECRET_KEY is empty".into()));
    }

    if key.contains("xxx") {
        return Err(PaymentError::Config(
            "STRIPE_SECRET_KEY is a placeholder, set a real key (sk_test_... or sk_live_...)"
                .into(),
        ));
    }

    if !SECRET_KEY_PREFIXES.iter().any(|prefix| key.starts_with(prefix)) {
        return Err(PaymentError::Config(
            "STRIPE_SECRET_KEY must start with sk_test_, sk_live_, rk_test_ or rk_live_".into(),
        ));
    }

    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
