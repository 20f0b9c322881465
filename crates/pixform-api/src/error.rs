//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors from the storage
//! and processing crates convert into `AppError` here so every failure renders
//! the same way: a status code from `ErrorMetadata` and a JSON body of the
//! form `{"error": "..."}`.
//!
//! Server-side failures also carry an `ErrorDetails` response extension;
//! `middleware::error_details` adds it to the body outside production.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixform_core::{AppError, ErrorMetadata, LogLevel};
use pixform_processing::TransformError;
use pixform_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Error chain; only present outside production for server-side failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse (orphan rules: both
/// the trait and `AppError` are foreign to this crate).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// Error chain of a server-side failure, attached to the response for the
/// error-details layer to render or drop.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub error: String,
    pub details: String,
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type, code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let message = app_error.client_message();
        let mut response = (status, Json(ErrorResponse::new(message.clone()))).into_response();

        if app_error.is_sensitive() {
            response.extensions_mut().insert(ErrorDetails {
                error: message,
                details: app_error.detailed_message(),
            });
        }

        response
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(value) => AppError::InvalidPathComponent(value),
            StorageError::NotFound(name) => AppError::NotFound(name),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<TransformError> for HttpAppError {
    fn from(err: TransformError) -> Self {
        let app = match err {
            TransformError::UnknownOperation(name) => AppError::UnknownOperation(name),
            TransformError::InvalidCropParameters => AppError::InvalidCropParameters,
            TransformError::InvalidRotationAngle => AppError::InvalidRotationAngle,
            err @ (TransformError::Decode(_) | TransformError::EmptyImage) => {
                AppError::ImageProcessing(err.to_string())
            }
            err @ TransformError::Encode { .. } => AppError::Internal(err.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_invalid_key() {
        let HttpAppError(app_err) = StorageError::InvalidKey("../x".to_string()).into();
        match app_err {
            AppError::InvalidPathComponent(value) => assert_eq!(value, "../x"),
            other => panic!("Expected InvalidPathComponent, got {:?}", other),
        }
    }

    #[test]
    fn test_from_storage_error_write_failed_is_internal() {
        let HttpAppError(app_err) = StorageError::WriteFailed("disk full".to_string()).into();
        assert!(matches!(app_err, AppError::Storage(_)));
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Storage(msg) => assert!(msg.contains("denied")),
            other => panic!("Expected Storage, got {:?}", other),
        }
    }

    #[test]
    fn test_from_transform_errors() {
        let HttpAppError(app_err) = TransformError::UnknownOperation("spin".to_string()).into();
        assert_eq!(app_err.client_message(), "Unknown operation: spin");
        assert_eq!(app_err.http_status_code(), 400);

        let HttpAppError(app_err) = TransformError::InvalidCropParameters.into();
        assert!(matches!(app_err, AppError::InvalidCropParameters));

        let HttpAppError(app_err) = TransformError::Decode("bad header".to_string()).into();
        assert_eq!(app_err.http_status_code(), 422);
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Username is required")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Username is required" }));
    }

    #[test]
    fn test_client_error_response_has_no_details() {
        let response = HttpAppError(AppError::UsernameRequired).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorDetails>().is_none());
    }

    #[test]
    fn test_server_error_carries_details_extension() {
        let source = anyhow::anyhow!("disk full").context("writing upload");
        let response = HttpAppError(AppError::from(source)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let details = response.extensions().get::<ErrorDetails>().unwrap();
        assert_eq!(details.error, "Internal server error");
        assert!(details.details.contains("disk full"));
    }
}
