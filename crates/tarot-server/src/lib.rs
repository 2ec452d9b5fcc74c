//! tarot-server HTTP surface
//!
//! Axum router for the Stripe endpoints used by the tarot web client.

pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use crate::state::AppState;

use crate::handlers::{
    create_checkout_session, health_check, payment_status, stripe_config, stripe_webhook,
};

/// Build the application router
pub fn router(state: AppState) -> Router {
    // The web client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/stripe/create-checkout-session", post(create_checkout_session))
        .route("/api/stripe/webhook", post(stripe_webhook))
        .route("/api/stripe/payment-status/{session_id}", get(payment_status))
        .route("/api/stripe/config", get(stripe_config))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
