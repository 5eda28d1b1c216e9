// handlers/protected/blogs.rs - Blog mutations
//
// The author is always the token's principal. Any `authorId` in a request
// body is dropped during deserialization and never reaches the service.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::api::{BlogInput, BlogView, MessageResponse};
use crate::app::AppState;
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};

use super::super::parse_blog_id;

/// POST /api/blogs - 201 with the created blog, 400 on missing fields
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<BlogInput>, JsonRejection>,
) -> ApiResult<BlogView> {
    let Json(input) = payload?;
    let blog = state
        .blogs
        .create(&principal, input.title, input.content)
        .await?;
    Ok(ApiResponse::created(blog))
}

/// PUT /api/blogs/:id - author only; 404 if absent, 403 if not the author
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<BlogInput>, JsonRejection>,
) -> ApiResult<BlogView> {
    let id = parse_blog_id(&id)?;
    let Json(input) = payload?;
    let blog = state
        .blogs
        .update(&principal, id, input.title, input.content)
        .await?;
    Ok(ApiResponse::success(blog))
}

/// DELETE /api/blogs/:id - author only; permanent
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    let id = parse_blog_id(&id)?;
    state.blogs.delete(&principal, id).await?;
    Ok(ApiResponse::success(MessageResponse::new("Blog deleted successfully")))
}
