//! tarot-server
//!
//! Axum-based server for Stripe checkout sessions and webhooks.

use tarot_payments::{DEFAULT_API_BASE, StripeConfig};
use tarot_server::{AppState, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Invalid configuration stops the server before it binds
    let config = StripeConfig::from_env().inspect_err(|e| {
        tracing::error!("Stripe configuration rejected: {}", e);
        tracing::error!("  Set STRIPE_SECRET_KEY=sk_test_... in .env");
    })?;

    if config.webhook_secret.is_none() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set - webhook endpoint will answer 500");
    }
    if config.api_base != DEFAULT_API_BASE {
        tracing::info!(api_base = %config.api_base, "Using custom Stripe API base");
    }

    let state = AppState::from_config(&config)?;
    let app = router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8901".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("tarot-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                                - Health check");
    tracing::info!("  POST /api/stripe/create-checkout-session    - Create Stripe checkout");
    tracing::info!("  POST /api/stripe/webhook                    - Stripe webhook");
    tracing::info!("  GET  /api/stripe/payment-status/{{id}}        - Session payment status");
    tracing::info!("  GET  /api/stripe/config                     - Public price configuration");

    axum::serve(listener, app).await?;

    Ok(())
}
