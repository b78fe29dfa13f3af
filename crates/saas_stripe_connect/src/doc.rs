// --- File: crates/saas_stripe_connect/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{ConnectStatusResponse, IndexQuery};
use crate::models::{OnboardingError, OnboardingResponse};
use saas_common::http::{ErrorBody, ErrorDetail};

#[utoipa::path(
    get,
    path = "/stripe-connect", // Relative to the configured base path
    params(IndexQuery),
    responses(
        (status = 200, description = "Stripe Connect settings page", content_type = "text/html"),
        (status = 401, description = "Stripe rejected the merchant's secret key", body = ErrorBody),
        (status = 502, description = "Stripe API error", body = ErrorBody)
    ),
    tag = "Stripe Connect"
)]
fn doc_index_handler() {}

#[utoipa::path(
    get,
    path = "/stripe-connect/status",
    responses(
        (status = 200, description = "Stored onboarding state", body = ConnectStatusResponse),
        (status = 500, description = "Host store error", body = ErrorBody)
    ),
    tag = "Stripe Connect"
)]
fn doc_stripe_connect_status_handler() {}

#[utoipa::path(
    post,
    path = "/stripe-onboard",
    responses(
        (status = 200, description = "Hosted onboarding url", body = OnboardingResponse),
        (status = 403, description = "Account or link creation failed", body = OnboardingError)
    ),
    tag = "Stripe Connect"
)]
fn doc_stripe_onboarding_handler() {}

#[utoipa::path(
    post,
    path = "/stripe-set-livemode",
    request_body(content = String, description = "`0` for test mode, `1` for live mode", content_type = "text/plain"),
    responses(
        (status = 302, description = "Livemode stored, redirect to the settings page"),
        (status = 500, description = "Body was neither `0` nor `1`", body = String)
    ),
    tag = "Stripe Connect"
)]
fn doc_set_stripe_livemode_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_index_handler,
        doc_stripe_connect_status_handler,
        doc_stripe_onboarding_handler,
        doc_set_stripe_livemode_handler
    ),
    components(schemas(
        ConnectStatusResponse,
        OnboardingResponse,
        OnboardingError,
        ErrorBody,
        ErrorDetail
    )),
    tags((name = "Stripe Connect", description = "Stripe Connect Express onboarding"))
)]
pub struct StripeConnectApiDoc;
