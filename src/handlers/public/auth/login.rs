// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::{Credentials, LoginResponse};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/auth/login - Authenticate user and receive JWT token
///
/// Expected Input:
/// ```json
/// { "email": "alice@example.com", "password": "..." }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "message": "Login successful",
///   "token": "eyJhbGciOiJIUzI1NiI...",
///   "user": { "id": "user_uuid", "email": "alice@example.com" }
/// }
/// ```
///
/// 400 on missing fields, 404 for an unknown email, 401 for a wrong password.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(credentials) = payload?;
    let response = state
        .auth
        .authenticate(credentials.email, credentials.password)
        .await?;
    Ok(ApiResponse::success(response))
}
