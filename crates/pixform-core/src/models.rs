use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `GET /list-images`: stored filenames for one user, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageListResponse {
    pub images: Vec<String>,
}

impl From<Vec<String>> for ImageListResponse {
    fn from(images: Vec<String>) -> Self {
        Self { images }
    }
}
