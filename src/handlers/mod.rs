// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod protected; // JWT authentication required (create/update/delete, whoami)
pub mod public; // No authentication required (list, register, login)
pub mod system; // Root banner and health probe

/// Parse a path id. A value that is not a UUID cannot name any blog, so it
/// is reported the same way as a missing one.
pub(crate) fn parse_blog_id(raw: &str) -> Result<uuid::Uuid, crate::error::ApiError> {
    raw.parse()
        .map_err(|_| crate::error::ApiError::not_found("Blog not found"))
}
