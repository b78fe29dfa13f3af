// --- File: crates/saas_stripe_connect/src/extension.rs ---
use axum::http::{header, HeaderMap};
use axum::Router;
use saas_config::StripeConnectConfig;
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::StripeClient;
use crate::error::StripeError;
use crate::host::StripeConnectHost;
use crate::models::{Account, BusinessProfile, Capability, CreateAccountLinkParams, CreateAccountParams};
use crate::routes::routes;

pub const INDEX_PATH: &str = "/stripe-connect";
pub const STATUS_PATH: &str = "/stripe-connect/status";
pub const ONBOARD_PATH: &str = "/stripe-onboard";
pub const LIVEMODE_PATH: &str = "/stripe-set-livemode";

/// Stripe Connect onboarding, wired to a host's storage.
///
/// Construct once with the host and mount [`StripeConnect::router`] into the
/// host application.
pub struct StripeConnect {
    host: Arc<dyn StripeConnectHost>,
    config: StripeConnectConfig,
    http: reqwest::Client,
}

impl StripeConnect {
    pub fn new(
        host: Arc<dyn StripeConnectHost>,
        config: StripeConnectConfig,
    ) -> Result<Self, StripeError> {
        let http = saas_common::create_client(config.request_timeout_secs)?;
        Ok(Self::with_http_client(host, config, http))
    }

    /// Like [`StripeConnect::new`] with a caller-provided HTTP client.
    pub fn with_http_client(
        host: Arc<dyn StripeConnectHost>,
        mut config: StripeConnectConfig,
        http: reqwest::Client,
    ) -> Self {
        debug!("Called StripeConnect::new");
        config.base_path = normalize_base_path(&config.base_path);
        Self { host, config, http }
    }

    pub fn host(&self) -> &dyn StripeConnectHost {
        self.host.as_ref()
    }

    pub fn config(&self) -> &StripeConnectConfig {
        &self.config
    }

    /// The onboarding routes, nested under the configured base path.
    pub fn router(self: &Arc<Self>) -> Router {
        let routes = routes(Arc::clone(self));
        if self.config.base_path.is_empty() {
            routes
        } else {
            Router::new().nest(&self.config.base_path, routes)
        }
    }

    pub fn index_path(&self) -> String {
        format!("{}{}", self.config.base_path, INDEX_PATH)
    }

    pub fn onboard_path(&self) -> String {
        format!("{}{}", self.config.base_path, ONBOARD_PATH)
    }

    pub fn livemode_path(&self) -> String {
        format!("{}{}", self.config.base_path, LIVEMODE_PATH)
    }

    /// Absolute url of the index page for the given `scheme://host/` prefix.
    pub fn index_url(&self, host_url: &str) -> String {
        format!("{}{}", host_url.trim_end_matches('/'), self.index_path())
    }

    /// `scheme://host/` of a request, honouring forwarded headers only when
    /// `trust_forwarded_headers` is configured.
    pub fn request_host_url(&self, headers: &HeaderMap) -> String {
        host_url_from_headers(headers, self.config.trust_forwarded_headers)
    }

    /// A Stripe client bound to the secret key the host currently returns.
    pub async fn client(&self) -> Result<StripeClient, StripeError> {
        let secret_key = self.host.get_stripe_secret_key().await?;
        Ok(StripeClient::new(
            self.http.clone(),
            secret_key,
            self.config.api_base_url.as_str(),
        ))
    }

    /// Creates an Express account from the host's business profile.
    ///
    /// `host_url` is the `scheme://host/` the request came in on; it becomes the
    /// business url when the profile has none.
    pub async fn create_stripe_connect_account(&self, host_url: &str) -> Result<Account, StripeError> {
        debug!("Called create_stripe_connect_account");

        let client = self.client().await?;
        let profile = self.host.get_stripe_business_profile().await?;
        let business_url = business_url(&profile, host_url, &self.config.fallback_domain);

        let params = CreateAccountParams {
            email: profile.email,
            default_currency: self.config.default_currency.clone(),
            business_name: profile.name,
            business_url,
        };
        client.create_account(&params).await
    }

    /// Looks up the host's account. Permission, invalid-request and
    /// missing-id failures mean there is no account yet and yield `Ok(None)`.
    pub async fn resolve_account(&self, client: &StripeClient) -> Result<Option<Account>, StripeError> {
        match self.host.get_stripe_connect_account(client).await {
            Ok(account) => Ok(Some(account)),
            Err(e) if e.is_account_absent() => {
                info!("No usable Stripe Connect account: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Generates a hosted onboarding link for `account_id`.
    ///
    /// A user sent to the return url has not necessarily finished onboarding,
    /// the index page re-checks the account and offers a new link if needed.
    pub async fn create_stripe_account_link(
        &self,
        client: &StripeClient,
        account_id: &str,
        host_url: &str,
    ) -> Result<String, StripeError> {
        debug!("Called create_stripe_account_link");
        let index_url = self.index_url(host_url);
        let params = CreateAccountLinkParams {
            account: account_id.to_string(),
            refresh_url: format!("{}?refresh=refresh", index_url),
            return_url: format!("{}?success=success", index_url),
        };
        let link = client.create_account_link(&params).await?;
        if let Some(expires_at) = link.expires_at_utc() {
            debug!("Onboarding link for {} expires at {}", account_id, expires_at);
        }
        Ok(link.url)
    }

    /// Requests the card_payments capability (again), needed after KYC onboarding.
    pub async fn modify_stripe_account_capability(
        &self,
        client: &StripeClient,
        account_id: &str,
    ) -> Result<Capability, StripeError> {
        debug!("Called modify_stripe_account_capability");
        client.modify_capability(account_id, "card_payments", true).await
    }

    /// Uses the existing account or creates one and stores its id, then
    /// returns a fresh onboarding link.
    pub async fn start_onboarding(&self, host_url: &str) -> Result<String, StripeError> {
        let client = self.client().await?;

        info!("Trying if there's an existing stripe account");
        let account_id = match self.resolve_account(&client).await? {
            Some(account) => {
                info!("Stripe account found, account id: {}", account.id);
                account.id
            }
            None => {
                info!("Could not find a stripe account, creating stripe account");
                let account = self.create_stripe_connect_account(host_url).await?;
                self.host
                    .set_stripe_connect_account_id(account.id.clone())
                    .await?;
                info!("Created stripe account {}", account.id);
                account.id
            }
        };

        self.create_stripe_account_link(&client, &account_id, host_url)
            .await
    }
}

/// Business url sent to Stripe: the profile's url, else the request host.
/// Loopback hosts are replaced by `fallback_domain`.
pub fn business_url(profile: &BusinessProfile, host_url: &str, fallback_domain: &str) -> String {
    match profile.url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ if host_url.contains("127.0.0.1") => fallback_domain.to_string(),
        _ => host_url.to_string(),
    }
}

/// `scheme://host/` of the incoming request.
///
/// Only the `Host` header is used unless `trust_forwarded` is set, in which
/// case `X-Forwarded-Proto` / `X-Forwarded-Host` from a reverse proxy win.
pub fn host_url_from_headers(headers: &HeaderMap, trust_forwarded: bool) -> String {
    let (forwarded_proto, forwarded_host) = if trust_forwarded {
        (
            first_header_value(headers, "x-forwarded-proto"),
            first_header_value(headers, "x-forwarded-host"),
        )
    } else {
        (None, None)
    };
    let scheme = forwarded_proto.unwrap_or("http");
    let host = forwarded_host
        .or_else(|| first_header_value(headers, header::HOST.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}/", scheme, host)
}

// Proxies append to forwarded headers, the first entry is the client-facing one.
fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn profile(url: Option<&str>) -> BusinessProfile {
        BusinessProfile {
            name: "Acme".to_string(),
            url: url.map(str::to_string),
            email: "owner@acme.test".to_string(),
        }
    }

    #[test]
    fn test_business_url_prefers_profile_url() {
        assert_eq!(
            business_url(&profile(Some("https://acme.test")), "http://127.0.0.1:5000/", "blackhole-1.iana.org"),
            "https://acme.test"
        );
    }

    #[test]
    fn test_business_url_loopback_uses_fallback_domain() {
        assert_eq!(
            business_url(&profile(None), "http://127.0.0.1:5000/", "blackhole-1.iana.org"),
            "blackhole-1.iana.org"
        );
    }

    #[test]
    fn test_business_url_uses_request_host() {
        assert_eq!(
            business_url(&profile(None), "https://shop.acme.test/", "blackhole-1.iana.org"),
            "https://shop.acme.test/"
        );
    }

    #[test]
    fn test_host_url_from_headers_uses_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("127.0.0.1:5000"));
        assert_eq!(host_url_from_headers(&headers, false), "http://127.0.0.1:5000/");

        assert_eq!(host_url_from_headers(&HeaderMap::new(), false), "http://localhost/");
    }

    #[test]
    fn test_host_url_from_headers_ignores_forwarded_unless_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("shop.acme.test"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("evil.test"));
        assert_eq!(host_url_from_headers(&headers, false), "http://shop.acme.test/");

        headers.insert("x-forwarded-host", HeaderValue::from_static("shop.acme.test, proxy.internal"));
        assert_eq!(host_url_from_headers(&headers, true), "https://shop.acme.test/");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("api"), "/api");
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("/saas/connect"), "/saas/connect");
    }
}
