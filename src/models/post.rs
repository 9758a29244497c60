//! Post model
//!
//! Defines the Post entity and its input types. A post always references an
//! existing author and category; tags are an ordered list of plain strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Ordered list of tags
    pub tags: Vec<String>,
    /// Author user id
    pub author_id: i64,
    /// Category id
    pub category_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Author reference expanded into post responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
}

/// Category reference expanded into post responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// Post with author and category expanded, as returned by list/detail reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithRefs {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: AuthorRef,
    pub category: CategoryRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Ordered list of tags
    pub tags: Vec<String>,
    /// Category id the post belongs to
    pub category_id: i64,
}

/// Input for updating a post (all fields optional)
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New body (optional)
    pub content: Option<String>,
    /// New tag list (optional, replaces the existing list)
    pub tags: Option<Vec<String>>,
    /// New category (optional)
    pub category_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_default_is_empty() {
        let input = UpdatePostInput::default();
        assert!(input.title.is_none());
        assert!(input.content.is_none());
        assert!(input.tags.is_none());
        assert!(input.category_id.is_none());
    }

    #[test]
    fn test_post_with_refs_serializes_expanded_fields() {
        let post = PostWithRefs {
            id: 1,
            title: "Hello".to_string(),
            content: "World".to_string(),
            tags: vec!["rust".to_string(), "blog".to_string()],
            author: AuthorRef {
                id: 2,
                username: "alice".to_string(),
            },
            category: CategoryRef {
                id: 3,
                name: "General".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&post).expect("should serialize");
        assert_eq!(json["author"]["username"], "alice");
        assert_eq!(json["category"]["name"], "General");
        assert_eq!(json["tags"][0], "rust");
    }
}
