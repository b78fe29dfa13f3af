use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Host-supplied data ---

/// Business profile the host supplies for account creation.
///
/// See <https://stripe.com/docs/api/accounts/object#account_object-business_profile>.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub email: String,
}

// --- Stripe objects ---

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountBusinessProfile {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// A Stripe Connect account, with the fields this component reads.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub business_profile: Option<AccountBusinessProfile>,
}

impl Account {
    /// Onboarding is complete once the account can both charge and pay out.
    pub fn is_onboarding_complete(&self) -> bool {
        self.charges_enabled && self.payouts_enabled
    }
}

/// Hosted onboarding link (`/v1/account_links`).
#[derive(Deserialize, Debug, Clone)]
pub struct AccountLink {
    pub url: String,
    pub expires_at: Option<i64>,
}

impl AccountLink {
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }
}

/// Express dashboard login link (`/v1/accounts/{id}/login_links`).
#[derive(Deserialize, Debug, Clone)]
pub struct LoginLink {
    pub url: String,
}

/// A capability on a Connect account (`/v1/accounts/{id}/capabilities/{capability}`).
#[derive(Deserialize, Debug, Clone)]
pub struct Capability {
    pub id: String,
    pub status: Option<String>,
    #[serde(default)]
    pub requested: bool,
}

/// Error envelope of Stripe API responses.
#[derive(Deserialize, Debug)]
pub(crate) struct StripeErrorEnvelope {
    pub error: StripeErrorBody,
}

#[derive(Deserialize, Debug)]
pub(crate) struct StripeErrorBody {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
}

// --- Request parameters ---

/// Parameters of `POST /v1/accounts` for an Express account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountParams {
    pub email: String,
    pub default_currency: String,
    pub business_name: String,
    pub business_url: String,
}

impl CreateAccountParams {
    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("type", "express".to_string()),
            ("email", self.email.clone()),
            ("default_currency", self.default_currency.clone()),
            ("business_profile[url]", self.business_url.clone()),
            ("business_profile[name]", self.business_name.clone()),
            ("capabilities[card_payments][requested]", "true".to_string()),
            ("capabilities[transfers][requested]", "true".to_string()),
        ]
    }
}

/// Parameters of `POST /v1/account_links`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountLinkParams {
    pub account: String,
    pub refresh_url: String,
    pub return_url: String,
}

impl CreateAccountLinkParams {
    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("type", "account_onboarding".to_string()),
            ("account", self.account.clone()),
            ("refresh_url", self.refresh_url.clone()),
            ("return_url", self.return_url.clone()),
        ]
    }
}

// --- Route payloads ---

/// Response of `POST /stripe-onboard`.
#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OnboardingResponse {
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://connect.stripe.com/setup/e/acct_1Nv0FGQ9RKHgCVdK/abc")
    )]
    pub url: String,
}

/// Error body of `POST /stripe-onboard`.
#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OnboardingError {
    #[cfg_attr(feature = "openapi", schema(example = "No such account: 'acct_123'"))]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_parses_stripe_payload() {
        let account: Account = serde_json::from_value(json!({
            "id": "acct_1",
            "object": "account",
            "type": "express",
            "charges_enabled": true,
            "payouts_enabled": false,
            "details_submitted": true,
            "email": "owner@acme.test",
            "business_profile": { "name": "Acme", "url": "acme.test", "mcc": null }
        }))
        .unwrap();

        assert_eq!(account.account_type.as_deref(), Some("express"));
        assert!(!account.is_onboarding_complete());
        assert_eq!(
            account.business_profile.unwrap().name.as_deref(),
            Some("Acme")
        );
    }

    #[test]
    fn test_account_missing_flags_default_to_false() {
        let account: Account = serde_json::from_value(json!({ "id": "acct_2" })).unwrap();
        assert!(!account.charges_enabled);
        assert!(!account.payouts_enabled);
    }

    #[test]
    fn test_account_link_expiry() {
        let link = AccountLink {
            url: "https://connect.stripe.com/setup/x".to_string(),
            expires_at: Some(1_700_000_000),
        };
        assert_eq!(
            link.expires_at_utc().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_create_account_form_requests_capabilities() {
        let params = CreateAccountParams {
            email: "owner@acme.test".to_string(),
            default_currency: "gbp".to_string(),
            business_name: "Acme".to_string(),
            business_url: "acme.test".to_string(),
        };
        let form = params.to_form();

        assert!(form.contains(&("type", "express".to_string())));
        assert!(form.contains(&("capabilities[card_payments][requested]", "true".to_string())));
        assert!(form.contains(&("capabilities[transfers][requested]", "true".to_string())));
        assert!(form.contains(&("business_profile[url]", "acme.test".to_string())));
    }
}
