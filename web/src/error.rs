use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The request itself was missing or malformed
    BadRequest(String),
    Domain(DomainError),
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Every failure ends only the request that hit it. Upstream failures are
// reported as 500, not 502: callers only need to know the publish did not happen.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::BadRequest(message) => {
                warn!("Rejecting request: {message}");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            Error::Domain(domain_error) => match domain_error.error_kind {
                DomainErrorKind::Internal(InternalErrorKind::Config) => {
                    error!("Missing or invalid configuration: {:?}", domain_error.source);
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                DomainErrorKind::Internal(internal_error_kind) => {
                    error!(
                        "Internal error {internal_error_kind:?}: {:?}",
                        domain_error.source
                    );
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                DomainErrorKind::External(ExternalErrorKind::Network) => {
                    error!("Upstream unreachable: {:?}", domain_error.source);
                    (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM UNAVAILABLE").into_response()
                }
                DomainErrorKind::External(ExternalErrorKind::Other(message)) => {
                    error!("Upstream error: {message}");
                    (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM ERROR").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = Error::BadRequest("Prompt is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_every_domain_error_maps_to_500() {
        let kinds = [
            DomainErrorKind::Internal(InternalErrorKind::Config),
            DomainErrorKind::Internal(InternalErrorKind::Serialization),
            DomainErrorKind::Internal(InternalErrorKind::Io),
            DomainErrorKind::Internal(InternalErrorKind::Other("x".to_string())),
            DomainErrorKind::External(ExternalErrorKind::Network),
            DomainErrorKind::External(ExternalErrorKind::Other("x".to_string())),
        ];

        for error_kind in kinds {
            let response = Error::Domain(DomainError {
                source: None,
                error_kind,
            })
            .into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
