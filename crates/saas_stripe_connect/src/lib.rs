// --- File: crates/saas_stripe_connect/src/lib.rs ---

pub mod client;
pub mod doc;
pub mod error;
pub mod extension;
pub mod handlers;
pub mod host;
pub mod models;
pub mod page;
pub mod routes;

// Re-export for host applications
pub use client::StripeClient;
pub use error::{StripeApiErrorKind, StripeError};
pub use extension::StripeConnect;
pub use host::StripeConnectHost;
pub use models::{Account, BusinessProfile, OnboardingError, OnboardingResponse};
pub use routes::routes;
