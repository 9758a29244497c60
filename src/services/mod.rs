//! Service layer
//!
//! Business logic for the Scrawl blog backend. Each service owns the rules
//! for one resource and exposes a `thiserror` error enum that the API layer
//! maps to HTTP responses.

pub mod category;
pub mod comment;
pub mod password;
pub mod post;
pub mod token;
pub mod user;

pub use category::{CategoryService, CategoryServiceError};
pub use comment::{CommentService, CommentServiceError};
pub use post::{PostService, PostServiceError};
pub use token::{TokenService, TokenServiceError};
pub use user::{UserService, UserServiceError};
