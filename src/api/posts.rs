//! Post API endpoints
//!
//! - GET /api/v1/posts - List all posts
//! - GET /api/v1/posts/{id} - Get a single post
//! - POST /api/v1/posts - Create a post (authenticated)
//! - PUT /api/v1/posts/{id} - Update a post (author only)
//! - DELETE /api/v1/posts/{id} - Delete a post (author only)
//!
//! List and detail responses expand the author and category references.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreatePostInput, PostWithRefs, UpdatePostInput};
use crate::services::PostServiceError;

/// Request body for creating a post
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: i64,
}

/// Request body for updating a post
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<i64>,
}

/// GET /api/v1/posts - List all posts
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithRefs>>, ApiError> {
    let posts = state.post_service.list().await.map_err(map_post_error)?;
    Ok(Json(posts))
}

/// GET /api/v1/posts/{id} - Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostWithRefs>, ApiError> {
    let post = state.post_service.get(id).await.map_err(map_post_error)?;
    Ok(Json(post))
}

/// POST /api/v1/posts - Create a post
///
/// The authenticated user becomes the post's author.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::from_validation_errors(&e))?;

    let input = CreatePostInput {
        title: body.title,
        content: body.content,
        tags: body.tags,
        category_id: body.category_id,
    };

    let post = state
        .post_service
        .create(user.id, input)
        .await
        .map_err(map_post_error)?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/v1/posts/{id} - Update a post (author only)
pub async fn update_post(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<PostWithRefs>, ApiError> {
    body.validate()
        .map_err(|e| ApiError::from_validation_errors(&e))?;

    let input = UpdatePostInput {
        title: body.title,
        content: body.content,
        tags: body.tags,
        category_id: body.category_id,
    };

    let post = state
        .post_service
        .update(id, user.id, input)
        .await
        .map_err(map_post_error)?;

    Ok(Json(post))
}

/// DELETE /api/v1/posts/{id} - Delete a post (author only)
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .post_service
        .delete(id, user.id)
        .await
        .map_err(map_post_error)?;

    Ok(Json(serde_json::json!({ "message": "Post deleted" })))
}

fn map_post_error(err: PostServiceError) -> ApiError {
    match err {
        PostServiceError::NotFound(id) => ApiError::not_found(format!("Post not found: {}", id)),
        PostServiceError::NotAuthor => {
            ApiError::forbidden("Only the post's author may modify it")
        }
        PostServiceError::CategoryNotFound(id) => {
            ApiError::validation_error(format!("Category not found: {}", id))
        }
        PostServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        PostServiceError::InternalError(e) => {
            tracing::error!("Post service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}
