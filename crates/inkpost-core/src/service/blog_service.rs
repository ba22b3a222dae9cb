use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Author, Category, Post, Tag};
use crate::error::{DomainError, RepoError};
use crate::markdown::{self, RenderedBody};
use crate::ports::{
    ArchiveMonth, AuthorRepository, CategoryRepository, PostRepository, TagRepository,
};

/// Number of posts in the "recent posts" sidebar widget.
pub const RECENT_POSTS: u64 = 5;

/// A post together with the records it references.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub category: Option<Category>,
    pub author: Option<Author>,
    pub tags: Vec<Tag>,
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub view: PostView,
    pub rendered: RenderedBody,
}

/// Data behind the sidebar widgets shown on every page.
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    pub recent_posts: Vec<Post>,
    pub archive_months: Vec<ArchiveMonth>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

/// Blog use cases on top of the repository ports.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    authors: Arc<dyn AuthorRepository>,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        authors: Arc<dyn AuthorRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
            authors,
        }
    }

    /// Save a post: check its references, stamp it, persist it.
    ///
    /// This is the only way a post reaches storage. The excerpt and the
    /// modification time are regenerated on every call.
    pub async fn save_post(&self, post: Post) -> Result<Post, DomainError> {
        if self.categories.find_by_id(post.category_id).await?.is_none() {
            return Err(DomainError::not_found("Category", post.category_id));
        }
        if self.authors.find_by_id(post.author_id).await?.is_none() {
            return Err(DomainError::not_found("Author", post.author_id));
        }
        for tag_id in &post.tag_ids {
            if self.tags.find_by_id(*tag_id).await?.is_none() {
                return Err(DomainError::not_found("Tag", *tag_id));
            }
        }

        let stamped = post.stamp(Utc::now())?;
        let saved = self.posts.save(stamped).await?;

        tracing::info!(post_id = %saved.id, excerpt_len = saved.excerpt.chars().count(), "Post saved");
        Ok(saved)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(|e| not_found_as("Post", id, e))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    pub async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Load a post and render its body with anchors and the TOC fragment.
    pub async fn post_detail(&self, id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find_post(id).await?;
        let rendered = markdown::render_with_toc(&post.body);
        tracing::debug!(post_id = %id, has_toc = rendered.has_toc(), "Post rendered");

        let category = self.categories.find_by_id(post.category_id).await?;
        let author = self.authors.find_by_id(post.author_id).await?;
        let mut tags = Vec::with_capacity(post.tag_ids.len());
        for tag_id in &post.tag_ids {
            if let Some(tag) = self.tags.find_by_id(*tag_id).await? {
                tags.push(tag);
            }
        }

        Ok(PostDetail {
            view: PostView {
                post,
                category,
                author,
                tags,
            },
            rendered,
        })
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.find_all().await?;
        self.views(posts).await
    }

    /// Posts created in the given month, newest first.
    pub async fn archive(&self, year: i32, month: u32) -> Result<Vec<PostView>, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation(format!("Invalid month: {month}")));
        }
        let posts = self.posts.find_by_month(year, month).await?;
        self.views(posts).await
    }

    pub async fn posts_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<(Category, Vec<PostView>), DomainError> {
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", category_id))?;
        let posts = self.posts.find_by_category(category_id).await?;
        Ok((category, self.views(posts).await?))
    }

    pub async fn posts_with_tag(&self, tag_id: Uuid) -> Result<(Tag, Vec<PostView>), DomainError> {
        let tag = self
            .tags
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", tag_id))?;
        let posts = self.posts.find_by_tag(tag_id).await?;
        Ok((tag, self.views(posts).await?))
    }

    /// The `limit` newest posts by creation time.
    pub async fn recent_posts(&self, limit: u64) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_recent(limit).await?)
    }

    /// Distinct months with at least one post, newest first.
    pub async fn archive_months(&self) -> Result<Vec<ArchiveMonth>, DomainError> {
        Ok(self.posts.archive_months().await?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.find_all().await?)
    }

    pub async fn sidebar(&self) -> Result<Sidebar, DomainError> {
        Ok(Sidebar {
            recent_posts: self.recent_posts(RECENT_POSTS).await?,
            archive_months: self.archive_months().await?,
            categories: self.categories().await?,
            tags: self.tags().await?,
        })
    }

    pub async fn save_category(&self, category: Category) -> Result<Category, DomainError> {
        Ok(self.categories.save(category).await?)
    }

    /// Delete a category and, with it, every post filed under it.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        self.categories
            .delete(id)
            .await
            .map_err(|e| not_found_as("Category", id, e))?;
        tracing::info!(category_id = %id, "Category deleted with its posts");
        Ok(())
    }

    pub async fn save_tag(&self, tag: Tag) -> Result<Tag, DomainError> {
        Ok(self.tags.save(tag).await?)
    }

    /// Delete a tag; posts keep existing without it.
    pub async fn delete_tag(&self, id: Uuid) -> Result<(), DomainError> {
        self.tags
            .delete(id)
            .await
            .map_err(|e| not_found_as("Tag", id, e))?;
        tracing::info!(tag_id = %id, "Tag deleted");
        Ok(())
    }

    /// Save an author. Usernames are unique across authors.
    pub async fn save_author(&self, author: Author) -> Result<Author, DomainError> {
        if let Some(existing) = self.authors.find_by_username(&author.username).await? {
            if existing.id != author.id {
                return Err(DomainError::Validation(format!(
                    "Username already taken: {}",
                    author.username
                )));
            }
        }
        Ok(self.authors.save(author).await?)
    }

    /// Delete an author and every post they wrote.
    pub async fn delete_author(&self, id: Uuid) -> Result<(), DomainError> {
        self.authors
            .delete(id)
            .await
            .map_err(|e| not_found_as("Author", id, e))?;
        tracing::info!(author_id = %id, "Author deleted with their posts");
        Ok(())
    }

    async fn views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let categories: HashMap<Uuid, Category> = self
            .categories
            .find_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let tags: HashMap<Uuid, Tag> = self
            .tags
            .find_all()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let authors: HashMap<Uuid, Author> = self
            .authors
            .find_all()
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                category: categories.get(&post.category_id).cloned(),
                author: authors.get(&post.author_id).cloned(),
                tags: post
                    .tag_ids
                    .iter()
                    .filter_map(|id| tags.get(id).cloned())
                    .collect(),
                post,
            })
            .collect())
    }
}

fn not_found_as(entity_type: &'static str, id: Uuid, err: RepoError) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
