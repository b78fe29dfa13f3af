// --- File: crates/saas_stripe_connect/src/client.rs ---
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::error::{StripeApiErrorKind, StripeError};
use crate::models::{
    Account, AccountLink, Capability, CreateAccountLinkParams, CreateAccountParams, LoginLink,
    StripeErrorEnvelope,
};

/// Stripe API client bound to one secret key.
///
/// Built per request from the key the host returns, so test and live keys
/// never leak across requests.
#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: String,
    api_base_url: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base_url", &self.api_base_url)
            .field("livemode", &self.is_live_key())
            .finish()
    }
}

impl StripeClient {
    pub fn new(http: Client, secret_key: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            http,
            secret_key: secret_key.into(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn is_live_key(&self) -> bool {
        self.secret_key.starts_with("sk_live_") || self.secret_key.starts_with("rk_live_")
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base_url, path)
    }

    /// Creates an Express account.
    pub async fn create_account(&self, params: &CreateAccountParams) -> Result<Account, StripeError> {
        info!("[Stripe Connect] Creating Express account for {}", params.email);
        let request = self.http.post(self.url("accounts")).form(&params.to_form());
        self.send(request).await
    }

    pub async fn retrieve_account(&self, account_id: &str) -> Result<Account, StripeError> {
        debug!("[Stripe Connect] Retrieving account {}", account_id);
        let request = self.http.get(self.url(&format!("accounts/{}", account_id)));
        self.send(request).await
    }

    /// Sets `requested` on one capability of a connected account.
    pub async fn modify_capability(
        &self,
        account_id: &str,
        capability: &str,
        requested: bool,
    ) -> Result<Capability, StripeError> {
        debug!(
            "[Stripe Connect] Setting capability {} requested={} on {}",
            capability, requested, account_id
        );
        let request = self
            .http
            .post(self.url(&format!("accounts/{}/capabilities/{}", account_id, capability)))
            .form(&[("requested", requested.to_string())]);
        self.send(request).await
    }

    pub async fn create_account_link(
        &self,
        params: &CreateAccountLinkParams,
    ) -> Result<AccountLink, StripeError> {
        debug!("[Stripe Connect] Creating onboarding link for {}", params.account);
        let request = self.http.post(self.url("account_links")).form(&params.to_form());
        self.send(request).await
    }

    /// Creates a single-use login link to the Express dashboard.
    pub async fn create_login_link(&self, account_id: &str) -> Result<LoginLink, StripeError> {
        debug!("[Stripe Connect] Creating dashboard login link for {}", account_id);
        let request = self
            .http
            .post(self.url(&format!("accounts/{}/login_links", account_id)));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StripeError> {
        let response = request
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body_text)?);
        }

        let (error_type, message) = match serde_json::from_str::<StripeErrorEnvelope>(&body_text) {
            Ok(envelope) => (
                envelope.error.error_type,
                envelope.error.message.unwrap_or_else(|| body_text.clone()),
            ),
            Err(_) => (None, body_text),
        };
        let kind = StripeApiErrorKind::from_response(status.as_u16(), error_type.as_deref());

        error!(
            "[Stripe Connect] Stripe API request failed with HTTP status: {} ({:?}). Message: {}",
            status, kind, message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            kind,
            message,
        })
    }
}
