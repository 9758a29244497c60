//! Category repository

use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, category: &Category) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    /// Check whether a category with the given name exists
    async fn exists_by_name(&self, name: &str) -> Result<bool>;
}

/// SQLx-based category repository implementation
pub struct SqlxCategoryRepository {
    pool: SqlitePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        let now = Utc::now();

        let result = sqlx::query("INSERT INTO categories (name, created_at) VALUES (?, ?)")
            .bind(&category.name)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to create category")?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: category.name.clone(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get category by ID")?;

        row.map(|row| row_to_category(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        rows.iter().map(row_to_category).collect()
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM categories WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check category name")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxCategoryRepository {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations should run");
        SqlxCategoryRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_list_categories() {
        let repo = setup().await;

        repo.create(&Category::new("Tech".to_string()))
            .await
            .expect("Create should succeed");
        repo.create(&Category::new("Life".to_string()))
            .await
            .expect("Create should succeed");

        let categories = repo.list().await.expect("List should succeed");
        assert_eq!(categories.len(), 2);
        // Ordered by name
        assert_eq!(categories[0].name, "Life");
        assert_eq!(categories[1].name, "Tech");
    }

    #[tokio::test]
    async fn test_exists_by_name() {
        let repo = setup().await;

        repo.create(&Category::new("Tech".to_string()))
            .await
            .expect("Create should succeed");

        assert!(repo.exists_by_name("Tech").await.expect("Check should succeed"));
        assert!(!repo.exists_by_name("Nope").await.expect("Check should succeed"));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_by_constraint() {
        let repo = setup().await;

        repo.create(&Category::new("Tech".to_string()))
            .await
            .expect("Create should succeed");
        assert!(repo.create(&Category::new("Tech".to_string())).await.is_err());
    }
}
