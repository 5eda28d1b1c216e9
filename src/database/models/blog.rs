use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the `blogs` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog joined with its author's email, as every read returns it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BlogRecord {
    #[sqlx(flatten)]
    pub blog: Blog,
    pub author_email: String,
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Fields a mutation may touch. `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl BlogChanges {
    pub fn apply(&self, blog: &mut Blog, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            blog.title = title.clone();
        }
        if let Some(content) = &self.content {
            blog.content = content.clone();
        }
        blog.updated_at = now;
    }
}
