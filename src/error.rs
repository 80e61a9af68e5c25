use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => StatusCode::NOT_FOUND,
                DatabaseError::Duplicate => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Precondition(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => "Resource not found",
                DatabaseError::Duplicate => "Resource already exists",
                _ => "An internal server error occurred",
            },
            AppError::Authentication(_) => "Authentication failed",
            AppError::Authorization(_) => "Access denied",
            AppError::Validation(_) => "Validation error",
            AppError::NotFound(_) => "Resource not found",
            AppError::Conflict(_) => "Resource conflict",
            AppError::Precondition(_) => "Precondition failed",
            AppError::InternalServerError(_) => "An internal server error occurred",
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        assert_eq!(
            AppError::Authentication("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Authorization("not the author".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Conflict("already enrolled".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Precondition("cart is empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("course".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn storage_duplicate_surfaces_as_conflict() {
        let err = AppError::from(DatabaseError::Duplicate);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_not_found_surfaces_as_404() {
        let err = AppError::from(DatabaseError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
