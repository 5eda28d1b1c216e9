use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{BlogView, LoginUser};

/// Logged-in identity as the client keeps it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: LoginUser,
    pub token: String,
}

/// Client-side application state: the session and a cache of blogs.
///
/// The cache is replaced wholesale by a list fetch and patched in place by
/// mutations. A list response that lands after a local delete will bring
/// the deleted post back until the next fetch.
#[derive(Debug, Default, Clone)]
pub struct ClientState {
    session: Option<Session>,
    blogs: Vec<BlogView>,
    error: Option<String>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Option<Session>) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn login(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn blogs(&self) -> &[BlogView] {
        &self.blogs
    }

    pub fn set_blogs(&mut self, blogs: Vec<BlogView>) {
        self.blogs = blogs;
    }

    /// Newly created posts go to the front, matching newest-first order
    pub fn add_blog(&mut self, blog: BlogView) {
        self.blogs.insert(0, blog);
    }

    pub fn update_blog(&mut self, id: Uuid, updated: BlogView) {
        for blog in self.blogs.iter_mut().filter(|b| b.id == id) {
            *blog = updated.clone();
        }
    }

    pub fn remove_blog(&mut self, id: Uuid) {
        self.blogs.retain(|b| b.id != id);
    }

    pub fn find_blog(&self, id: Uuid) -> Option<&BlogView> {
        self.blogs.iter().find(|b| b.id == id)
    }

    /// Whether to offer edit/delete for a post. Advisory only; the server
    /// decides on every mutation.
    pub fn can_edit(&self, blog: &BlogView) -> bool {
        self.session
            .as_ref()
            .map(|s| s.user.id == blog.author_id)
            .unwrap_or(false)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}
