//! Error types module
//!
//! All failures the service can report are unified under `AppError`. Each
//! variant self-describes how it is presented over HTTP through the
//! `ErrorMetadata` trait; the HTTP crate only renders what it is told.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as bad client input
    Debug,
    /// Recoverable issues such as oversized uploads or undecodable images
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNKNOWN_OPERATION")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed upload: missing file part, empty filename, unreadable multipart body.
    #[error("{0}")]
    BadRequest(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid crop parameters")]
    InvalidCropParameters,

    #[error("Invalid rotation angle")]
    InvalidRotationAngle,

    #[error("Username is required")]
    UsernameRequired,

    #[error("Invalid path component: {0}")]
    InvalidPathComponent(String),

    #[error("Unprocessable image: {0}")]
    ImageProcessing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::UnknownOperation(_) => (400, "UNKNOWN_OPERATION", false, LogLevel::Debug),
        AppError::InvalidCropParameters => {
            (400, "INVALID_CROP_PARAMETERS", false, LogLevel::Debug)
        }
        AppError::InvalidRotationAngle => (400, "INVALID_ROTATION_ANGLE", false, LogLevel::Debug),
        AppError::UsernameRequired => (400, "USERNAME_REQUIRED", false, LogLevel::Debug),
        AppError::InvalidPathComponent(_) => {
            (400, "INVALID_PATH_COMPONENT", false, LogLevel::Warn)
        }
        AppError::ImageProcessing(_) => (422, "UNPROCESSABLE_IMAGE", false, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Failed to store processed image".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::UnknownOperation(_) => "UnknownOperation",
            AppError::InvalidCropParameters => "InvalidCropParameters",
            AppError::InvalidRotationAngle => "InvalidRotationAngle",
            AppError::UsernameRequired => "UsernameRequired",
            AppError::InvalidPathComponent(_) => "InvalidPathComponent",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = match self {
            AppError::InternalWithSource { message, .. } => message.clone(),
            other => other.to_string(),
        };

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}
