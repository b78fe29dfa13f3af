// --- File: crates/services/saas_backend/src/merchant_host.rs ---
use async_trait::async_trait;
use saas_config::MerchantConfig;
use saas_stripe_connect::{BusinessProfile, StripeConnectHost, StripeError};
use tokio::sync::RwLock;
use tracing::info;

/// Stripe state of the single merchant this service runs for.
#[derive(Debug, Clone, Default)]
struct MerchantState {
    livemode: bool,
    account_id: Option<String>,
    completed: bool,
}

/// In-memory host seeded from the `[merchant]` config section.
///
/// State lives for the lifetime of the process; restarting falls back to the
/// configured values.
#[derive(Debug)]
pub struct MerchantHost {
    profile: BusinessProfile,
    test_secret_key: String,
    live_secret_key: Option<String>,
    state: RwLock<MerchantState>,
}

impl MerchantHost {
    pub fn from_config(merchant: &MerchantConfig) -> Self {
        Self {
            profile: BusinessProfile {
                name: merchant.name.clone(),
                url: merchant.url.clone().filter(|url| !url.is_empty()),
                email: merchant.email.clone(),
            },
            test_secret_key: merchant.test_secret_key.clone(),
            live_secret_key: merchant.live_secret_key.clone(),
            state: RwLock::new(MerchantState {
                livemode: merchant.livemode,
                account_id: merchant.account_id.clone(),
                completed: false,
            }),
        }
    }
}

#[async_trait]
impl StripeConnectHost for MerchantHost {
    /// The live key in live mode, the test key otherwise.
    async fn get_stripe_secret_key(&self) -> Result<String, StripeError> {
        if !self.state.read().await.livemode {
            return Ok(self.test_secret_key.clone());
        }
        self.live_secret_key.clone().ok_or_else(|| {
            StripeError::HostError("live mode is enabled but no live secret key is configured".to_string())
        })
    }

    async fn get_stripe_business_profile(&self) -> Result<BusinessProfile, StripeError> {
        Ok(self.profile.clone())
    }

    async fn get_stripe_livemode(&self) -> Result<bool, StripeError> {
        Ok(self.state.read().await.livemode)
    }

    async fn set_stripe_livemode(&self, livemode: bool) -> Result<(), StripeError> {
        self.state.write().await.livemode = livemode;
        Ok(())
    }

    async fn get_stripe_connect_account_id(&self) -> Result<Option<String>, StripeError> {
        Ok(self.state.read().await.account_id.clone())
    }

    async fn set_stripe_connect_account_id(&self, account_id: String) -> Result<(), StripeError> {
        info!("Storing Stripe Connect account {}", account_id);
        self.state.write().await.account_id = Some(account_id);
        Ok(())
    }

    async fn get_stripe_connect_completed_status(&self) -> Result<bool, StripeError> {
        Ok(self.state.read().await.completed)
    }

    async fn set_stripe_connect_completed_status(&self, status: bool) -> Result<(), StripeError> {
        self.state.write().await.completed = status;
        Ok(())
    }
}
