//! In-memory storage - used when no database is configured.

mod store;
mod tables;

pub use store::InMemoryBlogStore;
pub use tables::BlogTables;
