//! Content override API. Unauthenticated by contract: the admin UI is the
//! intended caller, but the route guard deliberately lets `/api/*` through.

use crate::content::store::{ContentEntry, ContentStore, ContentStoreError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub content_id: String,
}

fn error_response(status: StatusCode, err: &ContentStoreError) -> Response {
    error!("Content API error: {err}");
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn status_for(err: &ContentStoreError) -> StatusCode {
    match err {
        ContentStoreError::InvalidEntry(_) => StatusCode::BAD_REQUEST,
        ContentStoreError::Read(_) | ContentStoreError::Malformed(_) | ContentStoreError::Write(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// List every override entry.
#[utoipa::path(
    get,
    path = "/api/content",
    tag = "content",
    responses(
        (status = 200, description = "All override entries", body = [ContentEntry]),
        (status = 500, description = "Document missing or malformed")
    )
)]
pub async fn list(Extension(store): Extension<ContentStore>) -> Response {
    match store.list_all().await {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => error_response(status_for(&err), &err),
    }
}

/// Create or replace one override entry, keyed by `contentId`.
#[utoipa::path(
    post,
    path = "/api/content",
    tag = "content",
    request_body = ContentEntry,
    responses(
        (status = 200, description = "The saved entry", body = ContentEntry),
        (status = 400, description = "Empty contentId or empty text"),
        (status = 500, description = "Document malformed or write failed")
    )
)]
pub async fn save(
    Extension(store): Extension<ContentStore>,
    Json(entry): Json<ContentEntry>,
) -> Response {
    match store.upsert(entry).await {
        Ok(saved) => Json(saved).into_response(),
        Err(err) => error_response(status_for(&err), &err),
    }
}

/// Delete the entry matching `contentId`. Deleting an absent id succeeds.
#[utoipa::path(
    delete,
    path = "/api/content",
    tag = "content",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Entry removed (or was already absent)"),
        (status = 500, description = "Document malformed or write failed")
    )
)]
pub async fn remove(
    Extension(store): Extension<ContentStore>,
    Json(request): Json<DeleteRequest>,
) -> Response {
    match store.remove(&request.content_id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(err) => error_response(status_for(&err), &err),
    }
}
