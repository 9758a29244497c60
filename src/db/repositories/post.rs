//! Post repository
//!
//! Database operations for posts, including the ordered tag list stored in
//! `post_tags` and the author/category expansion used by list and detail
//! reads.

use crate::models::post::{AuthorRef, CategoryRef};
use crate::models::{Post, PostWithRefs};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post with its tag list
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by ID with author and category expanded
    async fn get_with_refs(&self, id: i64) -> Result<Option<PostWithRefs>>;

    /// List all posts with author and category expanded, newest first
    async fn list_with_refs(&self) -> Result<Vec<PostWithRefs>>;

    /// Update a post, replacing its tag list
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post (tags and comments cascade)
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check whether a post exists
    async fn exists(&self, id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }

    /// Replace the tag list inside the caller's transaction, so a failed
    /// tag write rolls back the post write with it.
    async fn replace_tags(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        post_id: i64,
        tags: &[String],
    ) -> Result<()> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut **tx)
            .await
            .context("Failed to clear post tags")?;

        for (position, tag) in tags.iter().enumerate() {
            sqlx::query("INSERT INTO post_tags (post_id, position, tag) VALUES (?, ?, ?)")
                .bind(post_id)
                .bind(position as i64)
                .bind(tag)
                .execute(&mut **tx)
                .await
                .context("Failed to insert post tag")?;
        }

        Ok(())
    }

    async fn load_tags(&self, post_id: i64) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT tag FROM post_tags WHERE post_id = ? ORDER BY position")
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to load post tags")?;

        Ok(rows.iter().map(|row| row.get("tag")).collect())
    }

    /// Load tags for many posts at once, grouped by post id
    async fn load_all_tags(&self) -> Result<HashMap<i64, Vec<String>>> {
        let rows = sqlx::query("SELECT post_id, tag FROM post_tags ORDER BY post_id, position")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load post tags")?;

        let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            let post_id: i64 = row.get("post_id");
            tags.entry(post_id).or_default().push(row.get("tag"));
        }
        Ok(tags)
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, content, author_id, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .bind(post.category_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create post")?;

        let id = result.last_insert_rowid();
        Self::replace_tags(&mut tx, id, &post.tags).await?;
        tx.commit().await.context("Failed to commit post create")?;

        Ok(Post {
            id,
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            author_id: post.author_id,
            category_id: post.category_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, author_id, category_id, created_at, updated_at
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by ID")?;

        match row {
            Some(row) => {
                let tags = self.load_tags(id).await?;
                Ok(Some(row_to_post(&row, tags)))
            }
            None => Ok(None),
        }
    }

    async fn get_with_refs(&self, id: i64) -> Result<Option<PostWithRefs>> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.title, p.content, p.created_at, p.updated_at,
                   u.id as author_id, u.username as author_username,
                   c.id as category_id, c.name as category_name
            FROM posts p
            INNER JOIN users u ON p.author_id = u.id
            INNER JOIN categories c ON p.category_id = c.id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post with references")?;

        match row {
            Some(row) => {
                let tags = self.load_tags(id).await?;
                Ok(Some(row_to_post_with_refs(&row, tags)))
            }
            None => Ok(None),
        }
    }

    async fn list_with_refs(&self) -> Result<Vec<PostWithRefs>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.title, p.content, p.created_at, p.updated_at,
                   u.id as author_id, u.username as author_username,
                   c.id as category_id, c.name as category_name
            FROM posts p
            INNER JOIN users u ON p.author_id = u.id
            INNER JOIN categories c ON p.category_id = c.id
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        let mut all_tags = self.load_all_tags().await?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                let tags = all_tags.remove(&id).unwrap_or_default();
                row_to_post_with_refs(row, tags)
            })
            .collect())
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, content = ?, category_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(now)
        .bind(post.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update post")?;

        Self::replace_tags(&mut tx, post.id, &post.tags).await?;
        tx.commit().await.context("Failed to commit post update")?;

        Ok(Post {
            updated_at: now,
            ..post.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // post_tags and comments are removed by ON DELETE CASCADE
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check post existence")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow, tags: Vec<String>) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        tags,
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_post_with_refs(row: &sqlx::sqlite::SqliteRow, tags: Vec<String>) -> PostWithRefs {
    PostWithRefs {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        tags,
        author: AuthorRef {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
        category: CategoryRef {
            id: row.get("category_id"),
            name: row.get("category_name"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, SqlxCategoryRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, User};

    struct Fixture {
        repo: SqlxPostRepository,
        author_id: i64,
        category_id: i64,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Migrations should run");

        let user = SqlxUserRepository::new(pool.clone())
            .create(&User::new(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .expect("User create should succeed");

        let category = SqlxCategoryRepository::new(pool.clone())
            .create(&Category::new("Tech".to_string()))
            .await
            .expect("Category create should succeed");

        Fixture {
            repo: SqlxPostRepository::new(pool),
            author_id: user.id,
            category_id: category.id,
        }
    }

    fn sample_post(fixture: &Fixture, tags: Vec<&str>) -> Post {
        Post {
            id: 0,
            title: "Hello".to_string(),
            content: "First post".to_string(),
            tags: tags.into_iter().map(String::from).collect(),
            author_id: fixture.author_id,
            category_id: fixture.category_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_preserves_tag_order() {
        let fixture = setup().await;

        let created = fixture
            .repo
            .create(&sample_post(&fixture, vec!["zeta", "alpha", "mid"]))
            .await
            .expect("Create should succeed");

        let loaded = fixture
            .repo
            .get_by_id(created.id)
            .await
            .expect("Get should succeed")
            .expect("Post should exist");
        assert_eq!(loaded.tags, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_get_with_refs_expands_author_and_category() {
        let fixture = setup().await;

        let created = fixture
            .repo
            .create(&sample_post(&fixture, vec!["rust"]))
            .await
            .expect("Create should succeed");

        let post = fixture
            .repo
            .get_with_refs(created.id)
            .await
            .expect("Get should succeed")
            .expect("Post should exist");
        assert_eq!(post.author.username, "alice");
        assert_eq!(post.category.name, "Tech");
    }

    #[tokio::test]
    async fn test_update_replaces_tags() {
        let fixture = setup().await;

        let mut post = fixture
            .repo
            .create(&sample_post(&fixture, vec!["old"]))
            .await
            .expect("Create should succeed");

        post.title = "Updated".to_string();
        post.tags = vec!["new".to_string(), "tags".to_string()];
        fixture.repo.update(&post).await.expect("Update should succeed");

        let loaded = fixture
            .repo
            .get_by_id(post.id)
            .await
            .expect("Get should succeed")
            .expect("Post should exist");
        assert_eq!(loaded.title, "Updated");
        assert_eq!(loaded.tags, vec!["new", "tags"]);
    }

    #[tokio::test]
    async fn test_failed_update_rolls_back_post_and_tags() {
        let fixture = setup().await;

        let mut post = fixture
            .repo
            .create(&sample_post(&fixture, vec!["keep"]))
            .await
            .expect("Create should succeed");

        post.title = "Should not stick".to_string();
        post.category_id = 9999;
        post.tags = vec!["lost".to_string()];
        let result = fixture.repo.update(&post).await;
        assert!(result.is_err(), "Update with unknown category should fail");

        let loaded = fixture
            .repo
            .get_by_id(post.id)
            .await
            .expect("Get should succeed")
            .expect("Post should exist");
        assert_eq!(loaded.title, "Hello");
        assert_eq!(loaded.tags, vec!["keep"]);
    }

    #[tokio::test]
    async fn test_delete_removes_post_and_tags() {
        let fixture = setup().await;

        let created = fixture
            .repo
            .create(&sample_post(&fixture, vec!["rust"]))
            .await
            .expect("Create should succeed");

        fixture.repo.delete(created.id).await.expect("Delete should succeed");

        assert!(!fixture
            .repo
            .exists(created.id)
            .await
            .expect("Check should succeed"));
        assert!(fixture
            .repo
            .load_tags(created.id)
            .await
            .expect("Load should succeed")
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let fixture = setup().await;

        let first = fixture
            .repo
            .create(&sample_post(&fixture, vec![]))
            .await
            .expect("Create should succeed");
        let second = fixture
            .repo
            .create(&sample_post(&fixture, vec![]))
            .await
            .expect("Create should succeed");

        let posts = fixture.repo.list_with_refs().await.expect("List should succeed");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, second.id);
        assert_eq!(posts[1].id, first.id);
    }
}
