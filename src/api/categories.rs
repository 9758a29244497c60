//! Category API endpoints
//!
//! - GET /api/v1/categories - List all categories
//! - POST /api/v1/categories - Create a category (authenticated)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Category, CreateCategoryInput};
use crate::services::CategoryServiceError;

/// Request body for creating a category
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
}

/// GET /api/v1/categories - List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state
        .category_service
        .list()
        .await
        .map_err(map_category_error)?;
    Ok(Json(categories))
}

/// POST /api/v1/categories - Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()
        .map_err(|e| ApiError::from_validation_errors(&e))?;

    let category = state
        .category_service
        .create(CreateCategoryInput { name: body.name })
        .await
        .map_err(map_category_error)?;

    Ok((StatusCode::CREATED, Json(category)))
}

fn map_category_error(err: CategoryServiceError) -> ApiError {
    match err {
        CategoryServiceError::DuplicateName(name) => {
            ApiError::conflict(format!("Category name already exists: {}", name))
        }
        CategoryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CategoryServiceError::InternalError(e) => {
            tracing::error!("Category service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}
