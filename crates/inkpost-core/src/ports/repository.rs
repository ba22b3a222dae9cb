use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Author, Category, Post, StampedPost, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `delete` applies the entity's cascade policy: removing a category or an
/// author removes their posts, removing a tag only detaches it.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// All tags ordered by name.
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError>;
}

#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Author>, RepoError>;

    async fn find_all(&self) -> Result<Vec<Author>, RepoError>;
}

/// A month that has at least one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ArchiveMonth {
    pub year: i32,
    pub month: u32,
}

/// Post repository.
///
/// Saving only accepts a [`StampedPost`]. Every list query returns posts
/// newest first by creation time.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Insert or update the post and replace its tag associations.
    async fn save(&self, post: StampedPost) -> Result<Post, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<Post>, RepoError>;

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Distinct creation months, newest first.
    async fn archive_months(&self) -> Result<Vec<ArchiveMonth>, RepoError>;
}
