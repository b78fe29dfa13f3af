// --- File: crates/saas_common/src/routes.rs ---

use axum::{routing::get, Router};

/// Routes shared by every deployment of the service.
pub fn routes() -> Router {
    Router::new().route("/health", get(|| async { "ok" }))
}
