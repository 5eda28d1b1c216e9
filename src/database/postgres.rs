use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{BlogChanges, BlogRecord, NewBlog, NewUser, User};
use crate::database::repository::Repository;

const BLOG_SELECT: &str = r#"
    SELECT b.id, b.title, b.content, b.author_id, b.created_at, b.updated_at,
           u.email AS author_email
    FROM blogs b
    JOIN users u ON u.id = b.author_id
"#;

/// Postgres-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(config).await?;
        DatabaseManager::ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_blogs(&self) -> Result<Vec<BlogRecord>, DatabaseError> {
        let sql = format!("{} ORDER BY b.created_at DESC", BLOG_SELECT);
        let blogs = sqlx::query_as::<_, BlogRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(blogs)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<BlogRecord>, DatabaseError> {
        let sql = format!("{} WHERE b.id = $1", BLOG_SELECT);
        let blog = sqlx::query_as::<_, BlogRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(blog)
    }

    async fn insert_blog(&self, blog: NewBlog) -> Result<BlogRecord, DatabaseError> {
        let now = Utc::now();
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO blogs (id, title, content, author_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(blog.author_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.find_blog(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("blog {} vanished after insert", id)))
    }

    async fn update_blog(
        &self,
        id: Uuid,
        changes: BlogChanges,
    ) -> Result<Option<BlogRecord>, DatabaseError> {
        let result = sqlx::query(
            "UPDATE blogs
             SET title = COALESCE($2, title),
                 content = COALESCE($3, content),
                 updated_at = $4
             WHERE id = $1",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_blog(id).await
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
