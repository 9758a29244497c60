//! Post service
//!
//! Business logic for post CRUD:
//! - a post always references an existing category at creation
//! - the author is always the authenticated user, never client-supplied
//! - update/delete re-check ownership per request: only the authoring user
//!   may mutate a post

use crate::db::repositories::{CategoryRepository, PostRepository};
use crate::models::{CreatePostInput, Post, PostWithRefs, UpdatePostInput};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// Requesting user is not the post's author
    #[error("Only the post's author may modify it")]
    NotAuthor,

    /// Referenced category does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service for managing blog posts
pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl PostService {
    /// Create a new post service
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        category_repo: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            post_repo,
            category_repo,
        }
    }

    /// List all posts with author and category expanded, newest first
    pub async fn list(&self) -> Result<Vec<PostWithRefs>, PostServiceError> {
        Ok(self
            .post_repo
            .list_with_refs()
            .await
            .context("Failed to list posts")?)
    }

    /// Get a single post with author and category expanded
    pub async fn get(&self, id: i64) -> Result<PostWithRefs, PostServiceError> {
        self.post_repo
            .get_with_refs(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))
    }

    /// Create a post authored by `author_id`.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if title or content is empty
    /// - `CategoryNotFound` if the category does not exist
    pub async fn create(
        &self,
        author_id: i64,
        input: CreatePostInput,
    ) -> Result<PostWithRefs, PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Content cannot be empty".to_string(),
            ));
        }

        self.ensure_category_exists(input.category_id).await?;

        let now = Utc::now();
        let post = Post {
            id: 0,
            title: input.title,
            content: input.content,
            tags: input.tags,
            author_id,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .post_repo
            .create(&post)
            .await
            .context("Failed to create post")?;

        self.get(created.id).await
    }

    /// Update a post. Only the author may update it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not resolve
    /// - `NotAuthor` if `user_id` is not the post's author
    /// - `CategoryNotFound` if a new category is given but does not exist
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: UpdatePostInput,
    ) -> Result<PostWithRefs, PostServiceError> {
        let mut post = self.get_owned(id, user_id).await?;

        if let Some(title) = input.title {
            if title.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            post.title = title;
        }
        if let Some(content) = input.content {
            if content.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Content cannot be empty".to_string(),
                ));
            }
            post.content = content;
        }
        if let Some(tags) = input.tags {
            post.tags = tags;
        }
        if let Some(category_id) = input.category_id {
            self.ensure_category_exists(category_id).await?;
            post.category_id = category_id;
        }

        self.post_repo
            .update(&post)
            .await
            .context("Failed to update post")?;

        self.get(id).await
    }

    /// Delete a post. Only the author may delete it.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), PostServiceError> {
        self.get_owned(id, user_id).await?;

        self.post_repo
            .delete(id)
            .await
            .context("Failed to delete post")?;
        Ok(())
    }

    /// Load a post and check the requesting user owns it
    async fn get_owned(&self, id: i64, user_id: i64) -> Result<Post, PostServiceError> {
        let post = self
            .post_repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))?;

        if post.author_id != user_id {
            return Err(PostServiceError::NotAuthor);
        }

        Ok(post)
    }

    async fn ensure_category_exists(&self, category_id: i64) -> Result<(), PostServiceError> {
        let exists = self
            .category_repo
            .get_by_id(category_id)
            .await
            .context("Failed to check category")?
            .is_some();
        if !exists {
            return Err(PostServiceError::CategoryNotFound(category_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxCategoryRepository, SqlxPostRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, User};

    struct Fixture {
        service: PostService,
        author_id: i64,
        other_user_id: i64,
        category_id: i64,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations should run");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let author = user_repo
            .create(&User::new(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("User create should succeed");
        let other = user_repo
            .create(&User::new(
                "bob".to_string(),
                "bob@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("User create should succeed");

        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let category = category_repo
            .create(&Category::new("Tech".to_string()))
            .await
            .expect("Category create should succeed");

        Fixture {
            service: PostService::new(SqlxPostRepository::boxed(pool), category_repo),
            author_id: author.id,
            other_user_id: other.id,
            category_id: category.id,
        }
    }

    fn sample_input(category_id: i64) -> CreatePostInput {
        CreatePostInput {
            title: "Hello".to_string(),
            content: "First post".to_string(),
            tags: vec!["rust".to_string()],
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let fixture = setup().await;

        let created = fixture
            .service
            .create(fixture.author_id, sample_input(fixture.category_id))
            .await
            .expect("Create should succeed");
        assert_eq!(created.author.username, "alice");
        assert_eq!(created.category.name, "Tech");

        let fetched = fixture.service.get(created.id).await.expect("Get should succeed");
        assert_eq!(fetched.title, "Hello");
    }

    #[tokio::test]
    async fn test_create_with_missing_category_fails() {
        let fixture = setup().await;

        let err = fixture
            .service
            .create(fixture.author_id, sample_input(999))
            .await
            .unwrap_err();
        assert!(matches!(err, PostServiceError::CategoryNotFound(999)));
    }

    #[tokio::test]
    async fn test_create_with_empty_title_fails() {
        let fixture = setup().await;

        let mut input = sample_input(fixture.category_id);
        input.title = "   ".to_string();
        let err = fixture.service.create(fixture.author_id, input).await.unwrap_err();
        assert!(matches!(err, PostServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_by_non_author_fails() {
        let fixture = setup().await;

        let created = fixture
            .service
            .create(fixture.author_id, sample_input(fixture.category_id))
            .await
            .expect("Create should succeed");

        let err = fixture
            .service
            .update(
                created.id,
                fixture.other_user_id,
                UpdatePostInput {
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PostServiceError::NotAuthor));
    }

    #[tokio::test]
    async fn test_update_by_author_succeeds() {
        let fixture = setup().await;

        let created = fixture
            .service
            .create(fixture.author_id, sample_input(fixture.category_id))
            .await
            .expect("Create should succeed");

        let updated = fixture
            .service
            .update(
                created.id,
                fixture.author_id,
                UpdatePostInput {
                    title: Some("Updated".to_string()),
                    tags: Some(vec!["a".to_string(), "b".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .expect("Update should succeed");
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.tags, vec!["a", "b"]);
        // Untouched fields are preserved
        assert_eq!(updated.content, "First post");
    }

    #[tokio::test]
    async fn test_delete_by_non_author_fails() {
        let fixture = setup().await;

        let created = fixture
            .service
            .create(fixture.author_id, sample_input(fixture.category_id))
            .await
            .expect("Create should succeed");

        let err = fixture
            .service
            .delete(created.id, fixture.other_user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, PostServiceError::NotAuthor));

        // Post is still there
        assert!(fixture.service.get(created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_author_succeeds() {
        let fixture = setup().await;

        let created = fixture
            .service
            .create(fixture.author_id, sample_input(fixture.category_id))
            .await
            .expect("Create should succeed");

        fixture
            .service
            .delete(created.id, fixture.author_id)
            .await
            .expect("Delete should succeed");

        let err = fixture.service.get(created.id).await.unwrap_err();
        assert!(matches!(err, PostServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let fixture = setup().await;

        let err = fixture
            .service
            .delete(999, fixture.author_id)
            .await
            .unwrap_err();
        assert!(matches!(err, PostServiceError::NotFound(999)));
    }
}
