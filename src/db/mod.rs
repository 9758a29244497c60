//! Database layer
//!
//! SQLite persistence for the Scrawl blog backend:
//! - connection pool creation (`pool`)
//! - code-based migrations embedded in the binary (`migrations`)
//! - trait-based repositories for each entity (`repositories`)

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
