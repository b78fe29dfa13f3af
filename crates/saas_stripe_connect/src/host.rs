//! The interface a host application implements to plug in its own storage
//! of Stripe-related merchant state.

use async_trait::async_trait;

use crate::client::StripeClient;
use crate::error::StripeError;
use crate::models::{Account, BusinessProfile};

/// Accessors for the host's Stripe state.
///
/// The component never stores anything itself: every read and write of the
/// secret key, account id, livemode flag and completion flag goes through here.
/// Errors returned by the host surface as [`StripeError::HostError`] or any
/// other variant the implementation picks.
#[async_trait]
pub trait StripeConnectHost: Send + Sync {
    /// Secret API key for the current mode (test or live).
    async fn get_stripe_secret_key(&self) -> Result<String, StripeError>;

    async fn get_stripe_business_profile(&self) -> Result<BusinessProfile, StripeError>;

    /// The merchant's Connect account.
    ///
    /// The default looks up the stored account id and retrieves the account
    /// from Stripe; without a stored id it fails with
    /// [`StripeError::MissingAccountId`].
    async fn get_stripe_connect_account(&self, client: &StripeClient) -> Result<Account, StripeError> {
        let account_id = self
            .get_stripe_connect_account_id()
            .await?
            .ok_or(StripeError::MissingAccountId)?;
        client.retrieve_account(&account_id).await
    }

    async fn get_stripe_livemode(&self) -> Result<bool, StripeError>;

    async fn set_stripe_livemode(&self, livemode: bool) -> Result<(), StripeError>;

    async fn get_stripe_connect_account_id(&self) -> Result<Option<String>, StripeError>;

    async fn set_stripe_connect_account_id(&self, account_id: String) -> Result<(), StripeError>;

    async fn get_stripe_connect_completed_status(&self) -> Result<bool, StripeError>;

    async fn set_stripe_connect_completed_status(&self, status: bool) -> Result<(), StripeError>;
}
