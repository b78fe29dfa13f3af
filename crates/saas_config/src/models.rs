// --- File: crates/saas_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Stripe Connect Config ---
// Holds non-secret settings of the onboarding component. Secret keys belong to the merchant.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConnectConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Domain sent as the business url when the host runs on 127.0.0.1,
    /// Stripe rejects loopback urls.
    #[serde(default = "default_fallback_domain")]
    pub fallback_domain: String,
    /// Path prefix the host mounts the routes under, e.g. "/api".
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Build request urls from X-Forwarded-Proto / X-Forwarded-Host.
    /// Enable only behind a reverse proxy that overwrites them.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

impl Default for StripeConnectConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_currency: default_currency(),
            fallback_domain: default_fallback_domain(),
            base_path: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            trust_forwarded_headers: false,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "gbp".to_string()
}

fn default_fallback_domain() -> String {
    "blackhole-1.iana.org".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

// --- Merchant Config ---
// Seed values for the in-memory host of the backend service.
// Secret keys use the "secret_from_env" marker:
// SAAS_SECRET_MERCHANT_TEST_SECRET_KEY / SAAS_SECRET_MERCHANT_LIVE_SECRET_KEY
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MerchantConfig {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub url: Option<String>,
    pub test_secret_key: String,
    #[serde(default)]
    pub live_secret_key: Option<String>,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub account_id: Option<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub use_stripe_connect: bool,

    #[serde(default)]
    pub stripe_connect: Option<StripeConnectConfig>,
    #[serde(default)]
    pub merchant: Option<MerchantConfig>,
}
