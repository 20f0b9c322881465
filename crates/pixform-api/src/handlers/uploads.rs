use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use pixform_core::AppError;
use pixform_processing::OutputFormat;
use pixform_storage::StorageError;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Serve a previously stored file from the upload directory.
///
/// Names that could not have been stored (nested paths, `..`) are reported
/// as missing rather than rejected.
#[tracing::instrument(skip(state))]
pub async fn get_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    let data = match state.storage.read(&filename).await {
        Ok(data) => data,
        Err(StorageError::InvalidKey(_)) | Err(StorageError::NotFound(_)) => {
            return Err(AppError::NotFound(filename).into());
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = OutputFormat::from_known_extension(&filename)
        .map(OutputFormat::content_type)
        .unwrap_or(FALLBACK_CONTENT_TYPE);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| HttpAppError::from(AppError::Internal(e.to_string())))
}
