//! Category service
//!
//! Business logic for category management: create and list, with name
//! uniqueness enforced.

use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CreateCategoryInput};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category name already exists
    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service for managing blog categories
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self.repo.list().await.context("Failed to list categories")?)
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the name is empty
    /// - `DuplicateName` if a category with the same name already exists
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category name is required".to_string(),
            ));
        }

        if self
            .repo
            .exists_by_name(name)
            .await
            .context("Failed to check name uniqueness")?
        {
            return Err(CategoryServiceError::DuplicateName(name.to_string()));
        }

        Ok(self
            .repo
            .create(&Category::new(name.to_string()))
            .await
            .context("Failed to create category")?)
    }
}
