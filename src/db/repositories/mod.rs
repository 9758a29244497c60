//! Repositories
//!
//! Trait-based data access for each entity, with sqlx/SQLite implementations.

pub mod category;
pub mod comment;
pub mod post;
pub mod user;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use user::{SqlxUserRepository, UserRepository};
