//! Unified error handling for the API.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use vitrine_core::{ApiErrorBody, ValidationError};

use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload or query failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiErrorBody::new(status.as_u16(), message))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use vitrine_core::ProductId;

    fn seed_invalid() -> RepositoryError {
        RepositoryError::SeedInvalid {
            path: "/srv/seed.json".into(),
            reason: "duplicate product id 1".to_string(),
        }
    }

    async fn body_of(err: AppError) -> (StatusCode, ApiErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation(ValidationError::NonPositivePrice);
        assert_eq!(err.to_string(), "Price must be greater than 0");

        let err = AppError::Repository(RepositoryError::NotFound(ProductId::new("9")));
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Validation(ValidationError::MissingRequiredFields).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BadRequest("bad json".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Repository(RepositoryError::NotFound(ProductId::new("9"))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Repository(seed_invalid()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let (status, body) =
            body_of(AppError::Repository(RepositoryError::NotFound(ProductId::new("9")))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, ApiErrorBody::new(404, "Product not found"));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = body_of(AppError::Repository(seed_invalid())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal server error");
        assert!(!body.message.contains("seed.json"));
        assert!(!body.success);
    }
}
