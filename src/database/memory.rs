use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Blog, BlogChanges, BlogRecord, NewBlog, NewUser, User};
use crate::database::repository::Repository;

/// In-process repository with the same integrity rules as the Postgres
/// schema. Selected with `BLOG_STORE=memory`; the test-suite runs on it.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // Insertion order doubles as the tie-breaker for equal timestamps
    blogs: Vec<Blog>,
}

impl Tables {
    fn author_email(&self, author_id: Uuid) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.id == author_id)
            .map(|u| u.email.as_str())
    }

    fn record(&self, blog: &Blog) -> Result<BlogRecord, DatabaseError> {
        let author_email = self.author_email(blog.author_id).ok_or_else(|| {
            DatabaseError::ForeignKey(format!("blog {} has no author {}", blog.id, blog.author_id))
        })?;
        Ok(BlogRecord {
            blog: blog.clone(),
            author_email: author_email.to_string(),
        })
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!(
                "duplicate key value violates unique constraint \"users_email_key\" ({})",
                user.email
            )));
        }

        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn list_blogs(&self) -> Result<Vec<BlogRecord>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut records = tables
            .blogs
            .iter()
            .rev()
            .map(|b| tables.record(b))
            .collect::<Result<Vec<_>, _>>()?;
        // Stable sort keeps later inserts ahead on equal timestamps
        records.sort_by(|a, b| b.blog.created_at.cmp(&a.blog.created_at));
        Ok(records)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<BlogRecord>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .blogs
            .iter()
            .find(|b| b.id == id)
            .map(|b| tables.record(b))
            .transpose()
    }

    async fn insert_blog(&self, blog: NewBlog) -> Result<BlogRecord, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.author_email(blog.author_id).is_none() {
            return Err(DatabaseError::ForeignKey(format!(
                "author {} does not exist",
                blog.author_id
            )));
        }

        let now = Utc::now();
        let row = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            content: blog.content,
            author_id: blog.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.blogs.push(row.clone());
        tables.record(&row)
    }

    async fn update_blog(
        &self,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogRecord>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let updated = match tables.blogs.iter_mut().find(|b| b.id == id) {
            Some(blog) => {
                changes.apply(blog, Utc::now());
                blog.clone()
            }
            None => return Ok(None),
        };
        tables.record(&updated).map(Some)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.blogs.len();
        tables.blogs.retain(|b| b.id != id);
        Ok(tables.blogs.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
