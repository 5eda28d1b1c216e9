use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// JWT authentication middleware that validates tokens and injects the
/// request's [`Principal`](crate::auth::Principal) into its extensions.
///
/// Missing header is 401; anything present that does not verify is 403.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers);
    let principal = state.auth.verify(token.as_deref())?;

    tracing::debug!("Authenticated request for user {}", principal.id);
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// `None` only when the header is absent. A header in any other shape
/// yields an empty token so verification rejects it.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|raw| {
            let mut parts = raw.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                    Some(token.to_string())
                }
                _ => None,
            }
        })
        .unwrap_or_default();

    Some(token)
}
