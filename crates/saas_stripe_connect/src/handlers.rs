// --- File: crates/saas_stripe_connect/src/handlers.rs ---
use askama::Template;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use saas_common::{log_error, log_result, SaasError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::StripeError;
use crate::extension::StripeConnect;
use crate::models::{OnboardingError, OnboardingResponse};
use crate::page::StripeConnectPage;

pub const INVALID_LIVEMODE_MESSAGE: &str =
    "Invalid request, valid values: '0' (test) or '1' (live)";

/// Query parameters Stripe appends when sending the merchant back.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct IndexQuery {
    /// Set on the refresh url (onboarding link expired or was reused).
    pub refresh: Option<String>,
    /// Set on the return url (merchant left the onboarding flow).
    pub success: Option<String>,
}

/// Stored onboarding state of the merchant.
#[derive(Serialize, Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectStatusResponse {
    #[cfg_attr(feature = "openapi", schema(example = "acct_1Nv0FGQ9RKHgCVdK"))]
    pub account_id: Option<String>,
    pub livemode: bool,
    pub completed: bool,
}

/// Settings page: refreshes the completion status and renders the account.
#[axum::debug_handler]
pub async fn index_handler(
    State(connect): State<Arc<StripeConnect>>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, SaasError> {
    debug!("Called stripe_connect index route");

    let host = connect.host();
    let client = connect.client().await?;

    let account = connect.resolve_account(&client).await?;
    let completed = account
        .as_ref()
        .is_some_and(|account| account.is_onboarding_complete());
    host.set_stripe_connect_completed_status(completed).await?;

    let mut dashboard_url = None;
    if let Some(account) = &account {
        if let Err(e) = connect
            .modify_stripe_account_capability(&client, &account.id)
            .await
        {
            log_error(e, "Could not update card_payments capability for account");
        }

        dashboard_url = match client.create_login_link(&account.id).await {
            Ok(link) => Some(link.url),
            Err(e) if e.is_invalid_request() => None,
            Err(e) => return Err(e.into()),
        };
    }

    let livemode = host.get_stripe_livemode().await?;
    let page = StripeConnectPage::new(account.as_ref(), livemode, dashboard_url)
        .with_paths(connect.onboard_path(), connect.livemode_path())
        .with_return_flags(query.refresh.is_some(), query.success.is_some());

    let html = page.render().map_err(StripeError::from)?;
    Ok(Html(html))
}

/// Starts (or resumes) onboarding and returns the hosted onboarding url.
///
/// Every failure is reported as 403 with the error text.
#[axum::debug_handler]
pub async fn stripe_onboarding_handler(
    State(connect): State<Arc<StripeConnect>>,
    headers: HeaderMap,
) -> Result<Json<OnboardingResponse>, (StatusCode, Json<OnboardingError>)> {
    debug!("called stripe_onboarding");

    let host_url = connect.request_host_url(&headers);
    match log_result(
        connect.start_onboarding(&host_url).await,
        "Stripe onboarding failed",
    ) {
        Ok(url) => Ok(Json(OnboardingResponse { url })),
        Err(e) => Err((
            StatusCode::FORBIDDEN,
            Json(OnboardingError {
                error: e.to_string(),
            }),
        )),
    }
}

/// Switches between test (`0`) and live (`1`) mode, then redirects to the index page.
#[axum::debug_handler]
pub async fn set_stripe_livemode_handler(
    State(connect): State<Arc<StripeConnect>>,
    body: Bytes,
) -> Result<Response, SaasError> {
    debug!("Called set_stripe_livemode");

    let livemode = match std::str::from_utf8(&body) {
        Ok("0") => false,
        Ok("1") => true,
        _ => {
            return Ok(
                (StatusCode::INTERNAL_SERVER_ERROR, Json(INVALID_LIVEMODE_MESSAGE)).into_response(),
            )
        }
    };

    connect.host().set_stripe_livemode(livemode).await?;
    info!("Stripe livemode set to {}", livemode);

    Ok((StatusCode::FOUND, [(header::LOCATION, connect.index_path())]).into_response())
}

/// Stored onboarding state, without calling Stripe.
#[axum::debug_handler]
pub async fn stripe_connect_status_handler(
    State(connect): State<Arc<StripeConnect>>,
) -> Result<Json<ConnectStatusResponse>, SaasError> {
    let host = connect.host();
    Ok(Json(ConnectStatusResponse {
        account_id: host.get_stripe_connect_account_id().await?,
        livemode: host.get_stripe_livemode().await?,
        completed: host.get_stripe_connect_completed_status().await?,
    }))
}
