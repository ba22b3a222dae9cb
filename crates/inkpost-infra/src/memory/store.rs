//! In-memory blog store - every repository port over one lock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkpost_core::domain::{Author, Category, Post, StampedPost, Tag};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{
    ArchiveMonth, AuthorRepository, BaseRepository, CategoryRepository, PostRepository,
    TagRepository,
};

use super::tables::BlogTables;

/// In-memory store using plain HashMaps behind an async RwLock.
///
/// Cascades run under the same write lock as the delete itself.
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryBlogStore {
    tables: Arc<RwLock<BlogTables>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current tables.
    pub async fn snapshot(&self) -> BlogTables {
        self.tables.read().await.clone()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let removed = self
            .tables
            .write()
            .await
            .remove_category(id)
            .ok_or(RepoError::NotFound)?;
        tracing::debug!(category_id = %id, posts = removed, "Cascading category delete");
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryBlogStore {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let detached = self
            .tables
            .write()
            .await
            .remove_tag(id)
            .ok_or(RepoError::NotFound)?;
        tracing::debug!(tag_id = %id, posts = detached, "Tag detached from posts");
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags: Vec<Tag> = self.tables.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[async_trait]
impl BaseRepository<Author, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn save(&self, author: Author) -> Result<Author, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .authors
            .values()
            .any(|a| a.username == author.username && a.id != author.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "Username '{}' already exists",
                author.username
            )));
        }
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let removed = self
            .tables
            .write()
            .await
            .remove_author(id)
            .ok_or(RepoError::NotFound)?;
        tracing::debug!(author_id = %id, posts = removed, "Cascading author delete");
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Author>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .authors
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        let mut authors: Vec<Author> = self.tables.read().await.authors.values().cloned().collect();
        authors.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(authors)
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: StampedPost) -> Result<Post, RepoError> {
        let post = post.into_inner();
        let mut tables = self.tables.write().await;

        if !tables.categories.contains_key(&post.category_id) {
            return Err(RepoError::Constraint(format!(
                "Unknown category {}",
                post.category_id
            )));
        }
        if !tables.authors.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!("Unknown author {}", post.author_id)));
        }
        if let Some(tag_id) = post.tag_ids.iter().find(|id| !tables.tags.contains_key(*id)) {
            return Err(RepoError::Constraint(format!("Unknown tag {tag_id}")));
        }

        Ok(tables.upsert_post(post))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .remove_post(id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts_newest_first(|_| true))
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.tables.read().await.posts_newest_first(|_| true);
        posts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(posts)
    }

    async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts_newest_first(|p| {
            p.created_at.year() == year && p.created_at.month() == month
        }))
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .posts_newest_first(|p| p.category_id == category_id))
    }

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .posts_newest_first(|p| p.tag_ids.contains(&tag_id)))
    }

    async fn archive_months(&self) -> Result<Vec<ArchiveMonth>, RepoError> {
        Ok(self.tables.read().await.archive_months())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use inkpost_core::BlogService;
    use inkpost_core::DomainError;

    use super::*;

    struct Fixture {
        store: InMemoryBlogStore,
        service: BlogService,
        category: Category,
        author: Author,
        tag: Tag,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryBlogStore::new();
        let service = BlogService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );

        let category = service
            .save_category(Category::new("Rust").unwrap())
            .await
            .unwrap();
        let author = service
            .save_author(Author::new("mie", "mie@example.com").unwrap())
            .await
            .unwrap();
        let tag = service.save_tag(Tag::new("async").unwrap()).await.unwrap();

        Fixture {
            store,
            service,
            category,
            author,
            tag,
        }
    }

    impl Fixture {
        fn draft(&self, title: &str, body: &str) -> Post {
            Post::new(title, body, self.category.id, self.author.id)
        }
    }

    #[tokio::test]
    async fn test_save_generates_excerpt() {
        let f = fixture().await;
        let saved = f
            .service
            .save_post(f.draft("Hello", "# Hello\nWorld"))
            .await
            .unwrap();

        assert_eq!(saved.excerpt, "Hello World");
        let stored = f.service.find_post(saved.id).await.unwrap();
        assert_eq!(stored.excerpt, "Hello World");
    }

    #[tokio::test]
    async fn test_update_regenerates_excerpt_and_timestamp() {
        let f = fixture().await;
        let first = f
            .service
            .save_post(f.draft("Post", "original body"))
            .await
            .unwrap();

        let mut edited = first.clone();
        edited.body = "edited body".to_string();
        let second = f.service.save_post(edited).await.unwrap();

        assert_eq!(second.excerpt, "edited body");
        assert!(second.modified_at >= first.modified_at);
        assert_eq!(second.created_at, first.created_at);

        let third = f.service.save_post(second.clone()).await.unwrap();
        assert!(third.modified_at >= second.modified_at);
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_references() {
        let f = fixture().await;
        let orphan = Post::new("Orphan", "", Uuid::new_v4(), f.author.id);

        let err = f.service.save_post(orphan).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity_type: "Category",
                ..
            }
        ));

        let bad_tag = f.draft("Tagged", "").with_tags([Uuid::new_v4()]);
        assert!(f.service.save_post(bad_tag).await.is_err());
    }

    #[tokio::test]
    async fn test_detail_renders_body_and_toc() {
        let f = fixture().await;
        let saved = f
            .service
            .save_post(f.draft("Hello", "# Hello\nWorld").with_tags([f.tag.id]))
            .await
            .unwrap();

        let detail = f.service.post_detail(saved.id).await.unwrap();
        assert!(detail.rendered.html.contains(r#"<h1 id="hello">Hello</h1>"#));
        assert_eq!(detail.rendered.toc, r##"<li><a href="#hello">Hello</a></li>"##);
        assert_eq!(detail.view.category.as_ref().unwrap().name, "Rust");
        assert_eq!(detail.view.author.as_ref().unwrap().username, "mie");
        assert_eq!(detail.view.tags, vec![f.tag.clone()]);
    }

    #[tokio::test]
    async fn test_detail_of_missing_post_is_not_found() {
        let f = fixture().await;
        let err = f.service.post_detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let f = fixture().await;
        let older = f
            .draft("Older", "")
            .with_created_at(Utc.with_ymd_and_hms(2023, 1, 5, 10, 0, 0).unwrap());
        let newer = f
            .draft("Newer", "")
            .with_created_at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        f.service.save_post(older).await.unwrap();
        f.service.save_post(newer).await.unwrap();

        let titles: Vec<String> = f
            .service
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.post.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_archive_filters_by_month() {
        let f = fixture().await;
        for (title, month) in [("Jan", 1), ("Mar", 3), ("Mar again", 3)] {
            let post = f
                .draft(title, "")
                .with_created_at(Utc.with_ymd_and_hms(2024, month, 2, 8, 0, 0).unwrap());
            f.service.save_post(post).await.unwrap();
        }

        let march = f.service.archive(2024, 3).await.unwrap();
        assert_eq!(march.len(), 2);
        assert!(f.service.archive(2023, 3).await.unwrap().is_empty());
        assert!(matches!(
            f.service.archive(2024, 13).await,
            Err(DomainError::Validation(_))
        ));

        let sidebar = f.service.sidebar().await.unwrap();
        assert_eq!(
            sidebar.archive_months,
            vec![
                ArchiveMonth { year: 2024, month: 3 },
                ArchiveMonth { year: 2024, month: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_sidebar_recent_posts_are_capped() {
        let f = fixture().await;
        for i in 0..7 {
            f.service
                .save_post(f.draft(&format!("Post {i}"), ""))
                .await
                .unwrap();
        }

        let sidebar = f.service.sidebar().await.unwrap();
        assert_eq!(sidebar.recent_posts.len(), 5);
        assert_eq!(sidebar.categories.len(), 1);
        assert_eq!(sidebar.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_category_cascades_to_posts() {
        let f = fixture().await;
        let post = f.service.save_post(f.draft("Doomed", "")).await.unwrap();

        f.service.delete_category(f.category.id).await.unwrap();

        assert!(f.store.snapshot().await.posts.is_empty());
        assert!(matches!(
            f.service.post_detail(post.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            f.service.posts_in_category(f.category.id).await,
            Err(DomainError::NotFound { entity_type: "Category", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_tag_keeps_posts() {
        let f = fixture().await;
        let post = f
            .service
            .save_post(f.draft("Tagged", "").with_tags([f.tag.id]))
            .await
            .unwrap();
        assert_eq!(f.service.posts_with_tag(f.tag.id).await.unwrap().1.len(), 1);

        f.service.delete_tag(f.tag.id).await.unwrap();

        let survivor = f.service.find_post(post.id).await.unwrap();
        assert!(survivor.tag_ids.is_empty());
        assert!(f.service.posts_with_tag(f.tag.id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_author_cascades_to_posts() {
        let f = fixture().await;
        f.service.save_post(f.draft("Mine", "")).await.unwrap();

        f.service.delete_author(f.author.id).await.unwrap();
        assert!(f.service.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_records_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.service.delete_post(Uuid::new_v4()).await,
            Err(DomainError::NotFound { entity_type: "Post", .. })
        ));
        assert!(matches!(
            f.service.delete_tag(Uuid::new_v4()).await,
            Err(DomainError::NotFound { entity_type: "Tag", .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let f = fixture().await;
        let err = f
            .service
            .save_author(Author::new("mie", "other@example.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resaving_author_keeps_username() {
        let f = fixture().await;
        let mut author = f.author.clone();
        author.email = "new@example.com".to_string();

        let saved = f.service.save_author(author).await.unwrap();
        assert_eq!(saved.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_username() {
        let store = InMemoryBlogStore::new();
        BaseRepository::<Author, Uuid>::save(&store, Author::new("mie", "a@example.com").unwrap())
            .await
            .unwrap();
        let err = BaseRepository::<Author, Uuid>::save(&store, Author::new("mie", "b@example.com").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }
}
