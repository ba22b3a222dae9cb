//! Database connection management and SeaORM repositories.

mod connections;

#[cfg(feature = "postgres")]
mod cascade;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;
#[cfg(feature = "postgres")]
pub mod schema;

pub use connections::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use cascade::CascadePolicy;
#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_base::PostgresBaseRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresAuthorRepository, PostgresCategoryRepository, PostgresPostRepository,
    PostgresTagRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
