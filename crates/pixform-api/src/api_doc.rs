//! OpenAPI documentation, served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use pixform_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixform API",
        version = "0.1.0",
        description = "Single-shot image transformations (crop, rotate, flip) with a per-user listing of processed results."
    ),
    paths(
        handlers::process::process_image,
        handlers::list::list_images,
    ),
    components(schemas(
        models::ImageListResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "images", description = "Image processing and listing")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_both_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/images/process"));
        assert!(doc.paths.paths.contains_key("/list-images"));
    }
}
