use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

/// API error that converts to a proper HTTP response. Carries the optional
/// re-auth hint and raw remote details the admin UI expects.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub redirect_to_auth: Option<String>,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(rename = "redirectToAuth", skip_serializing_if = "Option::is_none")]
    redirect_to_auth: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            redirect_to_auth: None,
            details: None,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn unauthenticated(shop: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Shop not authenticated".to_string(),
            redirect_to_auth: Some(format!("/auth?shop={shop}")),
            details: None,
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Unauthenticated { shop } => Self::unauthenticated(&shop),
            Error::NotFound => Self::not_found("Not found"),
            Error::AlreadyExists => Self::conflict("Already exists"),
            Error::BadRequest(message) => Self::bad_request(message),
            Error::MissingPrecondition(message) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            Error::Remote { status, body } => Self {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: "Remote API call failed".to_string(),
                redirect_to_auth: None,
                details: Some(body),
            },
            Error::Generation(message) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "Content generation failed".to_string(),
                redirect_to_auth: None,
                details: Some(message),
            },
            Error::Http(e) => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "Upstream request failed".to_string(),
                redirect_to_auth: None,
                details: Some(e.to_string()),
            },
            Error::Database(_) | Error::Io(_) | Error::Config(_) => {
                tracing::error!("internal error: {}", err);
                Self::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            redirect_to_auth: self.redirect_to_auth.as_deref(),
            details: self.details.as_deref(),
        };
        (self.status, Json(&body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_carries_redirect() {
        let err = ApiError::from(Error::Unauthenticated {
            shop: "test.myshopify.com".to_string(),
        });
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.redirect_to_auth.as_deref(),
            Some("/auth?shop=test.myshopify.com")
        );
    }

    #[test]
    fn test_remote_error_passes_status_through() {
        let err = ApiError::from(Error::Remote {
            status: 403,
            body: "forbidden".to_string(),
        });
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.details.as_deref(), Some("forbidden"));
    }

    #[test]
    fn test_database_error_is_opaque() {
        let err = ApiError::from(Error::Database(rusqlite::Error::InvalidQuery));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }
}
