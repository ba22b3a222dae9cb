//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    Set, TransactionTrait,
};
use uuid::Uuid;

use inkpost_core::domain::{Author, Category, Post, StampedPost, Tag};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{
    ArchiveMonth, AuthorRepository, CategoryRepository, PostRepository, TagRepository,
};

use super::cascade::CascadePolicy;
use super::entity::{author, category, post, post_tag, tag};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<category::Entity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<tag::Entity>;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<author::Entity>;

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Author>, RepoError> {
        tracing::debug!(username, "Finding author by username");

        let result = author::Entity::find()
            .filter(author::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        let result = author::Entity::find()
            .order_by_asc(author::Column::Username)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
///
/// Posts span two tables (`posts` and `post_tags`), so this one does not go
/// through the generic base repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn newest_first() -> Select<post::Entity> {
        post::Entity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
    }

    /// Run a post query and attach each post's tag ids.
    async fn load(&self, query: Select<post::Entity>) -> Result<Vec<Post>, RepoError> {
        let models = query.all(&self.db).await.map_err(query_error)?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let links = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut tags_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            tags_by_post.entry(link.post_id).or_default().push(link.tag_id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let tag_ids = tags_by_post.remove(&model.id).unwrap_or_default();
                let mut post = Post::from(model);
                post.tag_ids = tag_ids;
                post
            })
            .collect())
    }
}

/// `[first day of month, first day of next month)` in UTC.
fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self
            .load(post::Entity::find_by_id(id))
            .await?;
        Ok(posts.into_iter().next())
    }

    async fn save(&self, post: StampedPost) -> Result<Post, RepoError> {
        let post = post.into_inner();
        let txn = self.db.begin().await.map_err(query_error)?;

        // created_at is written once and left alone on update.
        post::Entity::insert(post::ActiveModel::from(&post))
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Body,
                        post::Column::ModifiedAt,
                        post::Column::Excerpt,
                        post::Column::CategoryId,
                        post::Column::AuthorId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(write_error)?;

        post::Entity::delete_dependents(&txn, post.id)
            .await
            .map_err(write_error)?;

        if !post.tag_ids.is_empty() {
            let links = post.tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(post.id),
                tag_id: Set(*tag_id),
            });
            post_tag::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(write_error)?;
        }

        // Read back so the caller sees the stored created_at, not its own.
        let stored = post::Entity::find_by_id(post.id)
            .one(&txn)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        txn.commit().await.map_err(query_error)?;

        let mut saved = Post::from(stored);
        saved.tag_ids = post.tag_ids;
        tracing::debug!(post_id = %saved.id, tags = saved.tag_ids.len(), "Post row written");
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        post::Entity::delete_dependents(&txn, id)
            .await
            .map_err(write_error)?;
        let result = post::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(write_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_error)?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        self.load(Self::newest_first()).await
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        self.load(Self::newest_first().limit(limit)).await
    }

    async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<Post>, RepoError> {
        let Some((start, end)) = month_bounds(year, month) else {
            return Ok(Vec::new());
        };
        let start: DateTimeWithTimeZone = start.into();
        let end: DateTimeWithTimeZone = end.into();

        self.load(
            Self::newest_first()
                .filter(post::Column::CreatedAt.gte(start))
                .filter(post::Column::CreatedAt.lt(end)),
        )
        .await
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.load(Self::newest_first().filter(post::Column::CategoryId.eq(category_id)))
            .await
    }

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        self.load(
            Self::newest_first()
                .join(
                    sea_orm::JoinType::InnerJoin,
                    post::Relation::PostTag.def(),
                )
                .filter(post_tag::Column::TagId.eq(tag_id)),
        )
        .await
    }

    async fn archive_months(&self) -> Result<Vec<ArchiveMonth>, RepoError> {
        let created: Vec<DateTimeWithTimeZone> = post::Entity::find()
            .select_only()
            .column(post::Column::CreatedAt)
            .order_by_desc(post::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut months: Vec<ArchiveMonth> = created
            .into_iter()
            .map(|at| {
                let at: DateTime<Utc> = at.into();
                ArchiveMonth {
                    year: at.year(),
                    month: at.month(),
                }
            })
            .collect();
        months.dedup();
        Ok(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");

        assert!(month_bounds(2024, 13).is_none());
        assert!(month_bounds(2024, 0).is_none());
    }
}
