//! Runtime feature checks.
//!
//! A feature is enabled when its `use_*` flag is set and its configuration
//! section is present.

use saas_config::AppConfig;

/// `true` when `use_feature` is set and the feature's configuration section exists.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Stripe Connect onboarding is enabled at runtime.
pub fn is_stripe_connect_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_stripe_connect, config.stripe_connect.as_ref())
}
