// --- File: crates/services/saas_backend/src/app.rs ---
use axum::Router;
use saas_common::{config_error, is_stripe_connect_enabled, SaasError};
use saas_config::AppConfig;
use saas_stripe_connect::StripeConnect;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::merchant_host::MerchantHost;

/// Builds the onboarding component when `use_stripe_connect` is set and the
/// `[stripe_connect]` section is present.
pub fn stripe_connect_from_config(config: &AppConfig) -> Result<Option<Arc<StripeConnect>>, SaasError> {
    if !is_stripe_connect_enabled(config) {
        info!("Stripe Connect is disabled");
        return Ok(None);
    }
    let merchant = config
        .merchant
        .as_ref()
        .ok_or_else(|| config_error("Stripe Connect is enabled but [merchant] is missing"))?;
    let connect_config = config.stripe_connect.clone().unwrap_or_default();

    let host = Arc::new(MerchantHost::from_config(merchant));
    let connect = StripeConnect::new(host, connect_config)?;
    Ok(Some(Arc::new(connect)))
}

/// The complete application router.
pub fn build_app(connect: Option<&Arc<StripeConnect>>) -> Router {
    let mut app = saas_common::routes();

    if let Some(connect) = connect {
        info!(
            "Stripe Connect routes mounted at {}",
            connect.index_path()
        );
        app = app.merge(connect.router());
    }

    #[cfg(feature = "openapi")]
    {
        use saas_stripe_connect::doc::StripeConnectApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "SaaS API",
                version = "0.1.0",
                description = "Merchant onboarding service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags( (name = "SaaS", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        if let Some(connect) = connect {
            let mut connect_doc = StripeConnectApiDoc::openapi();
            let base_path = &connect.config().base_path;
            if !base_path.is_empty() {
                connect_doc.paths.paths = connect_doc
                    .paths
                    .paths
                    .into_iter()
                    .map(|(path, item)| (format!("{}{}", base_path, path), item))
                    .collect();
            }
            openapi_doc.merge(connect_doc);
        }
        info!("📖 Adding Swagger UI at /docs");
        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use saas_config::{MerchantConfig, ServerConfig, StripeConnectConfig};
    use tower::ServiceExt;

    fn config(use_stripe_connect: bool, merchant: bool) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8086,
            },
            use_stripe_connect,
            stripe_connect: Some(StripeConnectConfig {
                base_path: "/api".to_string(),
                ..StripeConnectConfig::default()
            }),
            merchant: merchant.then(|| MerchantConfig {
                name: "Acme Bakery".to_string(),
                email: "owner@acme.test".to_string(),
                url: None,
                test_secret_key: "sk_test_123".to_string(),
                live_secret_key: None,
                livemode: false,
                account_id: Some("acct_seeded".to_string()),
            }),
        }
    }

    #[test]
    fn test_disabled_stripe_connect_builds_nothing() {
        assert!(stripe_connect_from_config(&config(false, true)).unwrap().is_none());
    }

    #[test]
    fn test_enabled_stripe_connect_requires_merchant() {
        let err = stripe_connect_from_config(&config(true, false)).err().unwrap();
        assert!(matches!(err, SaasError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_app_serves_health_and_mounted_status() {
        let connect = stripe_connect_from_config(&config(true, true)).unwrap();
        let app = build_app(connect.as_ref());

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/stripe-connect/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let status: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(status["account_id"], "acct_seeded");
        assert_eq!(status["livemode"], false);
    }

    #[tokio::test]
    async fn test_app_without_stripe_connect_has_no_onboarding_routes() {
        let app = build_app(None);
        let response = app
            .oneshot(
                Request::post("/api/stripe-onboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
