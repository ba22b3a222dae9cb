//! Application state - shared across all handlers.

use std::sync::Arc;

use inkpost_core::BlogService;
use inkpost_core::domain::{Author, Category, Post, Tag};
use inkpost_core::error::DomainError;
use inkpost_infra::{DatabaseConfig, InMemoryBlogStore};

#[cfg(feature = "postgres")]
use inkpost_infra::{
    PostgresAuthorRepository, PostgresCategoryRepository, PostgresPostRepository,
    PostgresTagRepository, database,
};

const DEMO_POST: &str = "\
# Welcome to Inkpost

Posts are written in **Markdown**. Every heading gets an anchor and shows up
in the table of contents.

## Code

```rust
fn main() {
    println!(\"hello\");
}
```

## Tables

| Feature | Supported |
|---------|-----------|
| Footnotes | yes[^1] |

[^1]: Along with definition lists and heading attributes.
";

/// Which backend the blog service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    InMemory,
}

impl Storage {
    pub fn as_str(self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::InMemory => "in-memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store
    /// when the database is not configured or unreachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match database::connect(config).await {
                Ok(db) => Self {
                    blog: BlogService::new(
                        Arc::new(PostgresPostRepository::new(db.clone())),
                        Arc::new(PostgresCategoryRepository::new(db.clone())),
                        Arc::new(PostgresTagRepository::new(db.clone())),
                        Arc::new(PostgresAuthorRepository::new(db)),
                    ),
                    storage: Storage::Postgres,
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::in_memory()
        };

        tracing::info!(storage = state.storage.as_str(), "Application state initialized");
        state
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        Self {
            blog: BlogService::new(store.clone(), store.clone(), store.clone(), store),
            storage: Storage::InMemory,
        }
    }

    /// Seed one author, category, tag and post so a fresh store has
    /// something to show.
    pub async fn seed_demo_content(&self) -> Result<Post, DomainError> {
        let author = self.blog.save_author(Author::new("admin", "admin@example.com")?).await?;
        let category = self.blog.save_category(Category::new("General")?).await?;
        let tag = self.blog.save_tag(Tag::new("welcome")?).await?;

        let post = Post::new("Welcome to Inkpost", DEMO_POST, category.id, author.id)
            .with_tags([tag.id]);
        let post = self.blog.save_post(post).await?;
        tracing::info!(post_id = %post.id, "Demo content seeded");
        Ok(post)
    }
}
