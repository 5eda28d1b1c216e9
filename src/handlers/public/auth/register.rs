// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{Credentials, PublicUser};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/auth/register - Register new user account
///
/// Responds 201 with `{id, email, createdAt}`; the password hash is never
/// returned. 400 on missing fields, 409 when the email is taken.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Json(credentials) = payload?;
    let user = state
        .auth
        .register(credentials.email, credentials.password)
        .await?;
    Ok(ApiResponse::created(user))
}
