use askama::Template;

use crate::models::Account;

/// The Stripe Connect settings page served by the index route.
#[derive(Template, Debug)]
#[template(path = "stripe/stripe_connect.html")]
pub struct StripeConnectPage {
    pub account_id: Option<String>,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
    pub details_submitted: bool,
    pub onboarding_complete: bool,
    pub livemode: bool,
    pub dashboard_url: Option<String>,
    pub onboard_path: String,
    pub livemode_path: String,
    /// Stripe sent the merchant back because the onboarding link expired.
    pub refreshed: bool,
    /// Stripe sent the merchant back from the onboarding flow.
    pub returned: bool,
}

impl StripeConnectPage {
    pub fn new(account: Option<&Account>, livemode: bool, dashboard_url: Option<String>) -> Self {
        Self {
            account_id: account.map(|a| a.id.clone()),
            charges_enabled: account.is_some_and(|a| a.charges_enabled),
            payouts_enabled: account.is_some_and(|a| a.payouts_enabled),
            details_submitted: account.is_some_and(|a| a.details_submitted),
            onboarding_complete: account.is_some_and(Account::is_onboarding_complete),
            livemode,
            dashboard_url,
            onboard_path: String::new(),
            livemode_path: String::new(),
            refreshed: false,
            returned: false,
        }
    }

    pub fn with_paths(mut self, onboard_path: String, livemode_path: String) -> Self {
        self.onboard_path = onboard_path;
        self.livemode_path = livemode_path;
        self
    }

    pub fn with_return_flags(mut self, refreshed: bool, returned: bool) -> Self {
        self.refreshed = refreshed;
        self.returned = returned;
        self
    }
}
