// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and read-only blog access.
pub mod auth;
pub mod blogs;
