// --- File: crates/saas_common/src/lib.rs ---

pub mod error; // Error handling
pub mod features; // Runtime feature checks
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod routes; // Shared routes

pub use routes::routes;

pub use error::{config_error, external_service_error, HttpStatusCode, SaasError};

pub use http::{
    client::{create_client, default_client},
    ErrorBody, IntoHttpResponse,
};

pub use logging::{init, init_with_level, log_error, log_result};

pub use features::{is_feature_enabled, is_stripe_connect_enabled};
