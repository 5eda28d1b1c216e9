use axum::extract::State;

use crate::api::PublicUser;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/users
pub async fn users_get(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    Ok(ApiResponse::success(state.auth.list_users().await?))
}
