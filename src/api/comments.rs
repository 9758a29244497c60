//! Comment API endpoints
//!
//! - GET /api/v1/comments/{post_id} - List a post's comments
//! - POST /api/v1/comments/{post_id} - Comment on a post (authenticated)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CommentWithAuthor, CreateCommentInput};
use crate::services::CommentServiceError;

/// Request body for creating a comment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Comment must be 1-500 characters"
    ))]
    pub content: String,
}

/// GET /api/v1/comments/{post_id} - List a post's comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentWithAuthor>>, ApiError> {
    let comments = state
        .comment_service
        .list_for_post(post_id)
        .await
        .map_err(map_comment_error)?;
    Ok(Json(comments))
}

/// POST /api/v1/comments/{post_id} - Comment on a post
///
/// The authenticated user becomes the commenter.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(post_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::from_validation_errors(&e))?;

    let comment = state
        .comment_service
        .create(
            user.id,
            CreateCommentInput {
                post_id,
                content: body.content,
            },
        )
        .await
        .map_err(map_comment_error)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

fn map_comment_error(err: CommentServiceError) -> ApiError {
    match err {
        CommentServiceError::PostNotFound(id) => {
            ApiError::not_found(format!("Post not found: {}", id))
        }
        CommentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CommentServiceError::InternalError(e) => {
            tracing::error!("Comment service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}
