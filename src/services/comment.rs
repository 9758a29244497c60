//! Comment service
//!
//! Business logic for comments: comments belong to an existing post and an
//! authenticated user, and content is capped at 500 characters.

use crate::db::repositories::{CommentRepository, PostRepository};
use crate::models::{Comment, CommentWithAuthor, CreateCommentInput, COMMENT_MAX_LENGTH};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Referenced post does not exist
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service for managing post comments
pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// List a post's comments with commenter usernames, oldest first
    pub async fn list_for_post(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, CommentServiceError> {
        self.ensure_post_exists(post_id).await?;

        Ok(self
            .comment_repo
            .list_by_post(post_id)
            .await
            .context("Failed to list comments")?)
    }

    /// Create a comment by `user_id` on the given post.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post does not exist
    /// - `ValidationError` if content is empty or over 500 characters
    pub async fn create(
        &self,
        user_id: i64,
        input: CreateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        if input.content.trim().is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment content is required".to_string(),
            ));
        }
        if input.content.chars().count() > COMMENT_MAX_LENGTH {
            return Err(CommentServiceError::ValidationError(format!(
                "Comment cannot be more than {} characters",
                COMMENT_MAX_LENGTH
            )));
        }

        self.ensure_post_exists(input.post_id).await?;

        let now = Utc::now();
        let comment = Comment {
            id: 0,
            post_id: input.post_id,
            user_id,
            content: input.content,
            created_at: now,
            updated_at: now,
        };

        Ok(self
            .comment_repo
            .create(&comment)
            .await
            .context("Failed to create comment")?)
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<(), CommentServiceError> {
        let exists = self
            .post_repo
            .exists(post_id)
            .await
            .context("Failed to check post existence")?;
        if !exists {
            return Err(CommentServiceError::PostNotFound(post_id));
        }
        Ok(())
    }
}
