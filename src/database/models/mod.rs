pub mod blog;
pub mod user;

pub use blog::{Blog, BlogChanges, BlogRecord, NewBlog};
pub use user::{NewUser, User};
