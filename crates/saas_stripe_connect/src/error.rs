use saas_common::{external_service_error, HttpStatusCode, SaasError};
use thiserror::Error;

/// Classification of Stripe API failures, following the error classes of
/// Stripe's official client libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeApiErrorKind {
    InvalidRequest,
    Authentication,
    Card,
    Permission,
    RateLimit,
    Api,
}

impl StripeApiErrorKind {
    /// Derives the kind from the HTTP status and the `error.type` field of the response.
    pub fn from_response(status_code: u16, error_type: Option<&str>) -> Self {
        // Status wins: Stripe sends 401s with type invalid_request_error.
        match (status_code, error_type) {
            (400 | 404, _) => Self::InvalidRequest,
            (401, _) => Self::Authentication,
            (402, _) => Self::Card,
            (403, _) => Self::Permission,
            (429, _) => Self::RateLimit,
            (_, Some("invalid_request_error")) => Self::InvalidRequest,
            (_, Some("card_error")) => Self::Card,
            _ => Self::Api,
        }
    }
}

/// Errors of the Stripe Connect onboarding component.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("{message}")]
    ApiError {
        status_code: u16,
        kind: StripeApiErrorKind,
        message: String,
    },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The host has no Connect account id stored
    #[error("No Stripe Connect account id stored for this merchant")]
    MissingAccountId,

    /// The host failed to read or write its Stripe state
    #[error("Host store error: {0}")]
    HostError(String),

    /// Rendering the onboarding page failed
    #[error("Failed to render page: {0}")]
    RenderError(#[from] askama::Error),
}

impl StripeError {
    /// Failures that mean "this merchant has no usable Connect account yet".
    pub fn is_account_absent(&self) -> bool {
        matches!(
            self,
            StripeError::MissingAccountId
                | StripeError::ApiError {
                    kind: StripeApiErrorKind::Permission | StripeApiErrorKind::InvalidRequest,
                    ..
                }
        )
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            StripeError::ApiError {
                kind: StripeApiErrorKind::InvalidRequest,
                ..
            }
        )
    }
}

/// Convert StripeError to SaasError
impl From<StripeError> for SaasError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => SaasError::HttpError(format!("Stripe request error: {}", e)),
            StripeError::ApiError {
                kind: StripeApiErrorKind::Authentication,
                message,
                ..
            } => SaasError::AuthError(format!("Stripe rejected the secret key: {}", message)),
            StripeError::ApiError {
                kind: StripeApiErrorKind::RateLimit,
                message,
                ..
            } => SaasError::RateLimitError(message),
            StripeError::ApiError { status_code, message, .. } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => SaasError::ParseError(format!("Stripe response parse error: {}", e)),
            StripeError::MissingAccountId => {
                SaasError::NotFoundError("Stripe Connect account id".to_string())
            }
            StripeError::HostError(msg) => SaasError::InternalError(format!("Host store error: {}", msg)),
            StripeError::RenderError(e) => SaasError::InternalError(format!("Page render error: {}", e)),
        }
    }
}

impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::RequestError(_) => 502,
            StripeError::ApiError { status_code, .. } => *status_code,
            StripeError::ParseError(_) => 502,
            StripeError::MissingAccountId => 404,
            StripeError::HostError(_) => 500,
            StripeError::RenderError(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status_code: u16, error_type: Option<&str>) -> StripeError {
        StripeError::ApiError {
            status_code,
            kind: StripeApiErrorKind::from_response(status_code, error_type),
            message: "nope".to_string(),
        }
    }

    #[test]
    fn test_kind_from_status() {
        assert_eq!(
            StripeApiErrorKind::from_response(404, Some("invalid_request_error")),
            StripeApiErrorKind::InvalidRequest
        );
        assert_eq!(StripeApiErrorKind::from_response(400, None), StripeApiErrorKind::InvalidRequest);
        assert_eq!(StripeApiErrorKind::from_response(401, None), StripeApiErrorKind::Authentication);
        assert_eq!(StripeApiErrorKind::from_response(402, None), StripeApiErrorKind::Card);
        assert_eq!(StripeApiErrorKind::from_response(403, None), StripeApiErrorKind::Permission);
        assert_eq!(StripeApiErrorKind::from_response(429, None), StripeApiErrorKind::RateLimit);
        assert_eq!(StripeApiErrorKind::from_response(500, Some("api_error")), StripeApiErrorKind::Api);
        assert_eq!(
            StripeApiErrorKind::from_response(401, Some("invalid_request_error")),
            StripeApiErrorKind::Authentication
        );
    }

    #[test]
    fn test_account_absent_errors() {
        assert!(StripeError::MissingAccountId.is_account_absent());
        assert!(api_error(403, None).is_account_absent());
        assert!(api_error(404, Some("invalid_request_error")).is_account_absent());
        assert!(!api_error(401, None).is_account_absent());
        assert!(!api_error(500, None).is_account_absent());
        assert!(!StripeError::HostError("down".into()).is_account_absent());
    }

    #[test]
    fn test_api_error_displays_stripe_message() {
        let err = StripeError::ApiError {
            status_code: 400,
            kind: StripeApiErrorKind::InvalidRequest,
            message: "No such account: 'acct_missing'".to_string(),
        };
        assert_eq!(err.to_string(), "No such account: 'acct_missing'");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_conversion_to_saas_error() {
        let saas: SaasError = api_error(401, None).into();
        assert_eq!(saas.status_code(), 401);

        let saas: SaasError = api_error(500, None).into();
        assert_eq!(saas.status_code(), 502);

        let saas: SaasError = StripeError::MissingAccountId.into();
        assert_eq!(saas.status_code(), 404);
    }
}
