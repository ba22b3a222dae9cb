//! Plain table set with the explicit cascade rules.

use std::collections::HashMap;

use chrono::Datelike;
use uuid::Uuid;

use inkpost_core::domain::{Author, Category, Post, Tag};
use inkpost_core::ports::ArchiveMonth;

/// Every record the blog stores.
#[derive(Debug, Default, Clone)]
pub struct BlogTables {
    pub posts: HashMap<Uuid, Post>,
    pub categories: HashMap<Uuid, Category>,
    pub tags: HashMap<Uuid, Tag>,
    pub authors: HashMap<Uuid, Author>,
}

impl BlogTables {
    /// Insert or replace a post, keeping the first `created_at` on update.
    pub fn upsert_post(&mut self, mut post: Post) -> Post {
        if let Some(existing) = self.posts.get(&post.id) {
            post.created_at = existing.created_at;
        }
        self.posts.insert(post.id, post.clone());
        post
    }

    pub fn remove_post(&mut self, id: Uuid) -> Option<Post> {
        self.posts.remove(&id)
    }

    /// Remove a category and every post filed under it.
    ///
    /// Returns the number of posts removed, or `None` if the category did
    /// not exist.
    pub fn remove_category(&mut self, id: Uuid) -> Option<usize> {
        self.categories.remove(&id)?;
        Some(self.remove_posts_where(|post| post.category_id == id))
    }

    /// Remove an author and every post they wrote.
    pub fn remove_author(&mut self, id: Uuid) -> Option<usize> {
        self.authors.remove(&id)?;
        Some(self.remove_posts_where(|post| post.author_id == id))
    }

    /// Remove a tag and detach it from its posts. Posts are kept.
    ///
    /// Returns the number of posts that lost the tag.
    pub fn remove_tag(&mut self, id: Uuid) -> Option<usize> {
        self.tags.remove(&id)?;
        let mut detached = 0;
        for post in self.posts.values_mut() {
            let before = post.tag_ids.len();
            post.tag_ids.retain(|tag_id| *tag_id != id);
            if post.tag_ids.len() != before {
                detached += 1;
            }
        }
        Some(detached)
    }

    fn remove_posts_where(&mut self, doomed: impl Fn(&Post) -> bool) -> usize {
        let before = self.posts.len();
        self.posts.retain(|_, post| !doomed(post));
        before - self.posts.len()
    }

    /// Posts matching `filter`, newest first.
    pub fn posts_newest_first(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.values().filter(|p| filter(p)).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        posts
    }

    pub fn archive_months(&self) -> Vec<ArchiveMonth> {
        let mut months: Vec<ArchiveMonth> = self
            .posts
            .values()
            .map(|post| ArchiveMonth {
                year: post.created_at.year(),
                month: post.created_at.month(),
            })
            .collect();
        months.sort_unstable_by(|a, b| b.cmp(a));
        months.dedup();
        months
    }
}
