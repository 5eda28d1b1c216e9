use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{BlogChanges, BlogRecord, NewBlog, NewUser, User};

/// Data-access seam handed to the services at construction time.
///
/// Implementations enforce email uniqueness (`DatabaseError::Conflict`) and
/// that every blog's author exists (`DatabaseError::ForeignKey`). All blog
/// reads come back joined with the author's email.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// All blogs, newest first.
    async fn list_blogs(&self) -> Result<Vec<BlogRecord>, DatabaseError>;

    async fn find_blog(&self, id: Uuid) -> Result<Option<BlogRecord>, DatabaseError>;

    async fn insert_blog(&self, blog: NewBlog) -> Result<BlogRecord, DatabaseError>;

    /// Returns `None` when the row no longer exists.
    async fn update_blog(
        &self,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogRecord>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_blog(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self) {}
}

pub type DynRepository = Arc<dyn Repository>;
