// Wire types shared by the HTTP handlers and the client
pub mod types;

pub use types::{
    AuthorRef, BlogInput, BlogView, Credentials, LoginResponse, LoginUser, MessageResponse,
    PublicUser,
};
