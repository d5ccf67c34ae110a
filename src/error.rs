use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::repo::StoreError;

/// Application error taxonomy, mapped onto HTTP statuses at the boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateUsername | AppError::DuplicateEmail => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Causes stay server-side; the client gets a generic body.
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                "An unexpected error occurred".to_string()
            }
            AppError::InvalidCredentials | AppError::Unauthorized => {
                warn!(%status, "authentication failure");
                self.to_string()
            }
            _ => self.to_string(),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateUsername => AppError::DuplicateUsername,
            StoreError::DuplicateEmail => AppError::DuplicateEmail,
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_errors_map_to_bad_request() {
        assert_eq!(AppError::DuplicateUsername.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DuplicateEmail.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn credential_errors_map_to_unauthorized() {
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn invalid_credentials_message_is_generic() {
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }
}
