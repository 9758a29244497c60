//! Data models
//!
//! Entity types and input structs for the Scrawl blog backend.

pub mod category;
pub mod comment;
pub mod post;
pub mod user;

pub use category::{Category, CreateCategoryInput};
pub use comment::{Comment, CommentWithAuthor, CreateCommentInput, COMMENT_MAX_LENGTH};
pub use post::{CreatePostInput, Post, PostWithRefs, UpdatePostInput};
pub use user::{CreateUserInput, User};
