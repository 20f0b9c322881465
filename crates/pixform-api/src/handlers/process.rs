use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Extension, Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pixform_core::AppError;
use pixform_processing::operation::DEFAULT_OPERATION;
use pixform_processing::{ImageTransformer, Operation, OutputFormat};
use pixform_storage::{derive_filename, timestamp_now, validate_path_component};

use crate::error::{ErrorResponse, HttpAppError};
use crate::middleware::RequestId;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const DEFAULT_USERNAME: &str = "anonymous";

/// The `file` part of the upload
struct UploadedFile {
    /// `None` when the part carried no filename parameter at all.
    filename: Option<String>,
    data: Bytes,
}

/// Everything submitted with one process request
#[derive(Default)]
struct ProcessForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl ProcessForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, HttpAppError> {
        let mut form = ProcessForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD && form.file.is_none() {
                let filename = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                form.file = Some(UploadedFile { filename, data });
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_insert(value);
            }
        }

        Ok(form)
    }
}

/// Transform an uploaded image, store a copy and return the encoded result.
///
/// Multipart fields: `file` (required), `operation` (`crop` | `rotate` |
/// `flip_h` | `flip_v`, default `crop`), `username` (default `anonymous`),
/// `x`/`y`/`width`/`height` for crop and `angle` for rotate.
///
/// The copy is written to the upload directory before the response is sent;
/// a failed write fails the request.
#[utoipa::path(
    post,
    path = "/images/process",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Transformed image bytes", content_type = "image/*"),
        (status = 400, description = "Missing file, invalid parameters or unknown operation", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 422, description = "Image could not be decoded", body = ErrorResponse),
        (status = 500, description = "Failed to store the processed image", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request_id, multipart),
    fields(operation = "process_image", request_id = %request_id.0)
)]
pub async fn process_image(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    // A body that is not multipart carries no file part.
    let mut multipart =
        multipart.map_err(|_| AppError::BadRequest("No file part".to_string()))?;
    let form = ProcessForm::read(&mut multipart).await?;

    let Some(UploadedFile {
        filename: Some(original_filename),
        data,
    }) = form.file
    else {
        return Err(AppError::BadRequest("No file part".to_string()).into());
    };
    if original_filename.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()).into());
    }

    let operation_name = form
        .fields
        .get("operation")
        .map(String::as_str)
        .unwrap_or(DEFAULT_OPERATION);
    let username = form
        .fields
        .get("username")
        .cloned()
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

    let operation = Operation::from_form(operation_name, &form.fields)?;
    validate_path_component(&username)?;
    validate_path_component(&original_filename)?;
    let format = OutputFormat::from_filename(&original_filename);

    tracing::debug!(
        username = %username,
        filename = %original_filename,
        operation = operation.name(),
        format = format.name(),
        size_bytes = data.len(),
        "Processing upload"
    );

    let processed = tokio::task::spawn_blocking(move || {
        ImageTransformer::process(&data, &operation, format)
    })
    .await
    .map_err(|e| {
        AppError::from(anyhow::Error::new(e).context("Image processing task failed"))
    })??;

    let stored_filename = derive_filename(&username, &timestamp_now(), &original_filename)?;
    let path = state.storage.store(&stored_filename, &processed.data).await?;

    tracing::info!(
        username = %username,
        stored_as = %stored_filename,
        path = %path.display(),
        width = processed.width,
        height = processed.height,
        "Processed image saved"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, processed.format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&format!("processed_{}", original_filename)),
        )
        .header(header::CONTENT_LENGTH, processed.data.len())
        .body(Body::from(processed.data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}

/// `attachment; filename="..."`, adding an RFC 5987 `filename*` when the
/// name is not printable ASCII.
fn attachment_disposition(filename: &str) -> String {
    let is_plain = filename
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control());
    if is_plain {
        let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
        format!("attachment; filename=\"{}\"", escaped)
    } else {
        let fallback: String = filename
            .chars()
            .map(|c| {
                if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(filename, NON_ALPHANUMERIC)
        )
    }
}
