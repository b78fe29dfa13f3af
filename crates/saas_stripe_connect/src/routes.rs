// --- File: crates/saas_stripe_connect/src/routes.rs ---

use crate::extension::{StripeConnect, INDEX_PATH, LIVEMODE_PATH, ONBOARD_PATH, STATUS_PATH};
use crate::handlers::{
    index_handler, set_stripe_livemode_handler, stripe_connect_status_handler,
    stripe_onboarding_handler,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all Stripe Connect onboarding routes.
pub fn routes(connect: Arc<StripeConnect>) -> Router {
    Router::new()
        .route(INDEX_PATH, get(index_handler))
        .route(STATUS_PATH, get(stripe_connect_status_handler))
        .route(ONBOARD_PATH, post(stripe_onboarding_handler))
        .route(LIVEMODE_PATH, post(set_stripe_livemode_handler))
        .with_state(connect)
}
