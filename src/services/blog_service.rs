use tracing::{info, warn};
use uuid::Uuid;

use crate::api::BlogView;
use crate::auth::Principal;
use crate::database::models::{Blog, BlogChanges, NewBlog};
use crate::database::DynRepository;
use crate::services::error::ServiceError;

/// Blog CRUD with the ownership rule on mutations.
///
/// Update and delete re-read the persisted row and compare its `author_id`
/// with the requesting principal every time; nothing about ownership is
/// cached or taken from the request body. Concurrent edits are last writer
/// wins.
#[derive(Clone)]
pub struct BlogService {
    repo: DynRepository,
}

/// Ownership check: the stored author must be the principal.
pub fn ensure_owner(blog: &Blog, principal: &Principal, action: &str) -> Result<(), ServiceError> {
    if blog.author_id != principal.id {
        warn!(
            "User {} tried to {} blog {} owned by {}",
            principal.id, action, blog.id, blog.author_id
        );
        return Err(ServiceError::Forbidden(format!(
            "Not authorized to {} this blog",
            action
        )));
    }
    Ok(())
}

impl BlogService {
    pub fn new(repo: DynRepository) -> Self {
        Self { repo }
    }

    /// Every blog, newest first. Unbounded.
    pub async fn list(&self) -> Result<Vec<BlogView>, ServiceError> {
        let records = self.repo.list_blogs().await?;
        Ok(records.into_iter().map(BlogView::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<BlogView, ServiceError> {
        self.repo
            .find_blog(id)
            .await?
            .map(BlogView::from)
            .ok_or_else(blog_not_found)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<BlogView, ServiceError> {
        let (title, content) = match (non_empty(title), non_empty(content)) {
            (Some(title), Some(content)) => (title, content),
            _ => {
                return Err(ServiceError::InvalidInput(
                    "Missing required fields".to_string(),
                ))
            }
        };

        let record = self
            .repo
            .insert_blog(NewBlog {
                author_id: principal.id,
                title,
                content,
            })
            .await?;

        info!("User {} created blog {}", principal.id, record.blog.id);
        Ok(record.into())
    }

    /// Change title and/or content. An absent field keeps its value; a
    /// present but blank one is rejected after the ownership check.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<BlogView, ServiceError> {
        let current = self.repo.find_blog(id).await?.ok_or_else(blog_not_found)?;
        ensure_owner(&current.blog, principal, "edit")?;

        if is_blank(&title) || is_blank(&content) {
            return Err(ServiceError::InvalidInput(
                "Title and content cannot be empty".to_string(),
            ));
        }

        let record = self
            .repo
            .update_blog(id, BlogChanges { title, content })
            .await?
            // Deleted between the read and the write
            .ok_or_else(blog_not_found)?;

        info!("User {} updated blog {}", principal.id, id);
        Ok(record.into())
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), ServiceError> {
        let current = self.repo.find_blog(id).await?.ok_or_else(blog_not_found)?;
        ensure_owner(&current.blog, principal, "delete")?;

        if !self.repo.delete_blog(id).await? {
            return Err(blog_not_found());
        }

        info!("User {} deleted blog {}", principal.id, id);
        Ok(())
    }
}

fn blog_not_found() -> ServiceError {
    ServiceError::NotFound("Blog not found".to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    matches!(value, Some(v) if v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::{MemoryRepository, Repository};
    use std::sync::Arc;

    struct Fixture {
        blogs: BlogService,
        alice: Principal,
        bob: Principal,
    }

    async fn principal(repo: &MemoryRepository, email: &str) -> Principal {
        let user = repo
            .insert_user(NewUser {
                email: email.to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();
        Principal {
            id: user.id,
            email: user.email,
        }
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(MemoryRepository::new());
        let alice = principal(&repo, "alice@example.com").await;
        let bob = principal(&repo, "bob@example.com").await;
        Fixture {
            blogs: BlogService::new(repo),
            alice,
            bob,
        }
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[tokio::test]
    async fn empty_list_is_ok() {
        let f = fixture().await;
        assert!(f.blogs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_sets_author_from_principal() {
        let f = fixture().await;
        let blog = f.blogs.create(&f.alice, s("Hi"), s("World")).await.unwrap();
        assert_eq!(blog.author_id, f.alice.id);
        assert_eq!(blog.author.email, "alice@example.com");
        assert_eq!(blog.created_at, blog.updated_at);

        let listed = f.blogs.list().await.unwrap();
        assert_eq!(listed, vec![blog]);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_blank_fields() {
        let f = fixture().await;
        for (title, content) in [(None, s("c")), (s("t"), None), (s("  "), s("c")), (s("t"), s(""))] {
            let err = f.blogs.create(&f.alice, title, content).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
        assert!(f.blogs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_the_author_may_mutate() {
        let f = fixture().await;
        let alices = f.blogs.create(&f.alice, s("a"), s("a")).await.unwrap();
        let bobs = f.blogs.create(&f.bob, s("b"), s("b")).await.unwrap();

        for (who, blog, owner) in [
            (&f.alice, &alices, true),
            (&f.alice, &bobs, false),
            (&f.bob, &alices, false),
            (&f.bob, &bobs, true),
        ] {
            let result = f.blogs.update(who, blog.id, s("new"), None).await;
            assert_eq!(result.is_ok(), owner, "update by {} on {}", who.email, blog.title);
            if !owner {
                assert!(matches!(result, Err(ServiceError::Forbidden(_))));
            }
        }

        // Non-owner deletes leave the rows in place
        assert!(matches!(
            f.blogs.delete(&f.bob, alices.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            f.blogs.delete(&f.alice, bobs.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(f.blogs.list().await.unwrap().len(), 2);

        f.blogs.delete(&f.alice, alices.id).await.unwrap();
        f.blogs.delete(&f.bob, bobs.id).await.unwrap();
        assert!(f.blogs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn forged_principal_email_does_not_grant_ownership() {
        let f = fixture().await;
        let blog = f.blogs.create(&f.alice, s("a"), s("a")).await.unwrap();
        let impostor = Principal {
            id: f.bob.id,
            email: f.alice.email.clone(),
        };
        let err = f.blogs.update(&impostor, blog.id, s("x"), s("y")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_keeps_identity_fields() {
        let f = fixture().await;
        let created = f.blogs.create(&f.alice, s("Hi"), s("World")).await.unwrap();

        let updated = f
            .blogs
            .update(&f.alice, created.id, s("Hello"), None)
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.author_id, created.author_id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "Hello");
        assert_eq!(updated.content, "World");
        assert!(updated.updated_at >= created.updated_at);

        assert_eq!(f.blogs.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_checks_existence_then_owner_then_input() {
        let f = fixture().await;
        let blog = f.blogs.create(&f.alice, s("a"), s("a")).await.unwrap();

        let err = f.blogs.update(&f.alice, Uuid::new_v4(), s(""), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = f.blogs.update(&f.bob, blog.id, s(""), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = f.blogs.update(&f.alice, blog.id, s(""), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn deleted_blog_is_gone_for_every_operation() {
        let f = fixture().await;
        let blog = f.blogs.create(&f.alice, s("a"), s("a")).await.unwrap();
        f.blogs.delete(&f.alice, blog.id).await.unwrap();

        assert!(matches!(f.blogs.get(blog.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            f.blogs.update(&f.alice, blog.id, s("x"), s("y")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            f.blogs.delete(&f.alice, blog.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
