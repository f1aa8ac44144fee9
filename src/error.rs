//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::repository::RepositoryError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// HTTP status, machine-readable code and client-facing message
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => {
                let (status, code) = match domain_err {
                    DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                    DomainError::EventNotFound(_) => (StatusCode::NOT_FOUND, "event_not_found"),
                    DomainError::ApplicationNotFound(_) => {
                        (StatusCode::NOT_FOUND, "event_volunteer_not_found")
                    }
                    DomainError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "category_not_found"),
                    DomainError::FaqNotFound(_) => (StatusCode::NOT_FOUND, "faq_not_found"),
                    DomainError::CapacityExceeded { .. } => (StatusCode::CONFLICT, "capacity_exceeded"),
                    DomainError::DuplicateRegistration { .. } => {
                        (StatusCode::CONFLICT, "duplicate_registration")
                    }
                    DomainError::CapacityBelowRoster { .. } => {
                        (StatusCode::CONFLICT, "capacity_below_roster")
                    }
                    DomainError::SlugTaken(_) => (StatusCode::CONFLICT, "slug_taken"),
                    DomainError::StatusConflict(_) => (StatusCode::CONFLICT, "status_conflict"),
                    DomainError::InvalidTransition { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "invalid_transition")
                    }
                };
                (status, code, domain_err.to_string())
            }

            // 500 Internal Server Error
            AppError::Repository(e) => {
                tracing::error!("Repository error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();

        let body = ErrorResponse {
            success: false,
            message,
            error_code: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(format!("Id is not valid: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_status_mapping() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::EventNotFound("x".into()), StatusCode::NOT_FOUND),
            (
                DomainError::CapacityExceeded {
                    current: 1,
                    required: 1,
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::DuplicateRegistration {
                    event_id: Uuid::new_v4(),
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::InvalidTransition {
                    from: crate::domain::ApplicationStatus::Accepted,
                    to: crate::domain::ApplicationStatus::Pending,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_repository_error_hides_details() {
        let err = AppError::from(RepositoryError::InvalidRow("status 'x'".to_string()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "database_error");
        assert!(!message.contains("status"));
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(
            AppError::unauthorized("no token").into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("admin only").into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
