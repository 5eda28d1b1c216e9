// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, which places the
// verified `Principal` in the request extensions.
pub mod auth;
pub mod blogs;
