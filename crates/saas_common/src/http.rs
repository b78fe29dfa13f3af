// --- File: crates/saas_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{HttpStatusCode, SaasError};

pub mod client;

/// JSON body returned for unexpected failures.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorDetail {
    pub message: String,
    pub code: u16,
}

/// Extension trait for SaasError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for SaasError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(ErrorBody {
            error: ErrorDetail {
                message: self.to_string(),
                code: status_code.as_u16(),
            },
        });

        (status_code, body).into_response()
    }
}

impl IntoResponse for SaasError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
