// handlers/public/blogs.rs - Read-only blog endpoints

use axum::extract::{Path, State};

use crate::api::BlogView;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

use super::super::parse_blog_id;

/// GET /api/blogs - all blogs, newest first, each with `authorId` and
/// `author.email`. An empty store yields `[]`.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<BlogView>> {
    Ok(ApiResponse::success(state.blogs.list().await?))
}

/// GET /api/blogs/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<BlogView> {
    let id = parse_blog_id(&id)?;
    Ok(ApiResponse::success(state.blogs.get(id).await?))
}
