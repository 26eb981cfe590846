use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::media::MediaError;
use crate::models::MissingField;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

impl From<MissingField> for AppError {
    fn from(e: MissingField) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Store(StoreError::NotFound { collection, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Record {id} not found in {collection}"),
            ),
            AppError::Store(e) => {
                tracing::error!("Record store error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORE_ERROR",
                    "The record store could not be reached".to_string(),
                )
            }
            AppError::Media(MediaError::Rejected(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Media(e) => {
                tracing::error!("Media upload error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MEDIA_ERROR",
                    "The file could not be uploaded".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(AppError::Validation("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::Store(StoreError::NotFound {
                collection: "certificates".to_string(),
                id: "c1".to_string(),
            })),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Store(StoreError::Api {
                status: 500,
                message: "boom".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Media(MediaError::Rejected("too big".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Media(MediaError::MissingUrl)),
            StatusCode::BAD_GATEWAY
        );
    }
}
