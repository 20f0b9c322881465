use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::{ErrorDetails, ErrorResponse};
use crate::state::AppState;

/// Outside production, rewrite server-side error bodies to include the error
/// chain recorded by `HttpAppError`.
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if state.config.is_production() {
        return response;
    }

    let Some(ErrorDetails { error, details }) = response.extensions().get::<ErrorDetails>().cloned()
    else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = ErrorResponse {
        error,
        details: Some(details),
    };

    (parts, Json(body)).into_response()
}
