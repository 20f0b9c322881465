use axum::{
    extract::{Query, State},
    Json,
};
use pixform_core::{AppError, ImageListResponse};
use pixform_storage::user_prefix;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListImagesQuery {
    /// Only files saved under this username are listed
    pub username: Option<String>,
}

/// List stored images for a user, sorted by name (oldest upload first).
#[utoipa::path(
    get,
    path = "/list-images",
    tag = "images",
    params(ListImagesQuery),
    responses(
        (status = 200, description = "Stored filenames for the user", body = ImageListResponse),
        (status = 400, description = "Username is required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListImagesQuery>,
) -> Result<Json<ImageListResponse>, HttpAppError> {
    let username = match query.username {
        Some(username) if !username.is_empty() => username,
        _ => return Err(AppError::UsernameRequired.into()),
    };

    let images = state.storage.list_with_prefix(&user_prefix(&username)).await?;
    tracing::debug!(username = %username, count = images.len(), "Listed images");

    Ok(Json(ImageListResponse::from(images)))
}
