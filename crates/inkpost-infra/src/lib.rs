//! # Inkpost Infrastructure
//!
//! Concrete implementations of the repository ports defined in `inkpost-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//! - `minimal` - No external database, in-memory store only

pub mod database;
pub mod memory;

pub use database::DatabaseConfig;
pub use memory::InMemoryBlogStore;

#[cfg(feature = "postgres")]
pub use database::{
    PostgresAuthorRepository, PostgresCategoryRepository, PostgresPostRepository,
    PostgresTagRepository,
};
