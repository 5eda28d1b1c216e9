pub mod auth_service;
pub mod blog_service;
pub mod error;

pub use auth_service::AuthService;
pub use blog_service::{ensure_owner, BlogService};
pub use error::ServiceError;
