use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.title,
            "message": self.message.unwrap_or_default(),
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = e.to_string();
        match e {
            ServiceError::Validation(m) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(m)),
            ServiceError::CertificateExists | ServiceError::RequestPending | ServiceError::NotPending { .. } => {
                warn!(error = %msg, "business rule rejected request");
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(msg))
            }
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(m)),
            ServiceError::Db(_) => {
                error!(error = %msg, "service failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(msg))
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let msg = e.to_string();
        match e {
            AuthError::Validation(m) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(m)),
            AuthError::EmailTaken => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => Self::unauthorized(msg),
            AuthError::Hash(_) | AuthError::Storage(_) => {
                error!(kind = e.kind(), error = %msg, "auth failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(msg))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database setup failed: {0}")]
    Database(String),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::certificate_request::RequestStatus;

    #[test]
    fn business_errors_map_to_400() {
        for e in [
            ServiceError::CertificateExists,
            ServiceError::RequestPending,
            ServiceError::NotPending { status: RequestStatus::Rejected },
        ] {
            assert_eq!(JsonApiError::from(e).status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn not_found_and_db_errors() {
        assert_eq!(JsonApiError::from(ServiceError::not_found("certificate 1")).status, StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::from(ServiceError::Db("boom".into())).status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors() {
        assert_eq!(JsonApiError::from(AuthError::EmailTaken).status, StatusCode::CONFLICT);
        assert_eq!(JsonApiError::from(AuthError::InvalidCredentials).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::Validation("x".into())).status, StatusCode::BAD_REQUEST);
    }
}
