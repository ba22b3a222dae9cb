use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identified;
use crate::error::DomainError;
use crate::markdown;

/// Maximum post title length, in characters.
pub const TITLE_MAX_LENGTH: usize = 70;

/// Post entity - a Markdown blog post.
///
/// `excerpt` and `modified_at` are derived on every save; see [`Post::stamp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub excerpt: String,
    pub category_id: Uuid,
    pub tag_ids: Vec<Uuid>,
    pub author_id: Uuid,
}

impl Post {
    /// Create a new, not yet stamped post.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        category_id: Uuid,
        author_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            created_at: now,
            modified_at: now,
            excerpt: String::new(),
            category_id,
            tag_ids: Vec::new(),
            author_id,
        }
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.modified_at = self.modified_at.max(created_at);
        self
    }

    /// Prepare the post for persistence.
    ///
    /// Validates the title, regenerates the excerpt from the current body and
    /// moves `modified_at` to `now` (never backwards). Runs unconditionally,
    /// even when nothing changed since the last save.
    pub fn stamp(mut self, now: DateTime<Utc>) -> Result<StampedPost, DomainError> {
        let title_len = self.title.chars().count();
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Post title is required".to_string()));
        }
        if title_len > TITLE_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Post title exceeds {TITLE_MAX_LENGTH} characters"
            )));
        }

        self.excerpt = markdown::render_excerpt(&self.body);
        self.modified_at = self.modified_at.max(now);

        let mut seen = std::collections::HashSet::new();
        self.tag_ids.retain(|id| seen.insert(*id));

        Ok(StampedPost(self))
    }
}

impl Identified for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A post whose derived fields match its body.
///
/// Only [`Post::stamp`] creates one, and repositories accept nothing else,
/// so a stale excerpt cannot reach storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedPost(Post);

impl StampedPost {
    pub fn post(&self) -> &Post {
        &self.0
    }

    pub fn into_inner(self) -> Post {
        self.0
    }
}

impl std::ops::Deref for StampedPost {
    type Target = Post;

    fn deref(&self) -> &Post {
        &self.0
    }
}
