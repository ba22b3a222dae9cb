//! Explicit delete policies.
//!
//! The foreign keys carry `ON DELETE CASCADE` as well, but deletes never rely
//! on it: every repository delete first removes dependents through these
//! functions inside the same transaction.

use async_trait::async_trait;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QuerySelect, QueryTrait,
};
use uuid::Uuid;

use super::entity::{author, category, post, post_tag, tag};

/// Rows that must be removed before a parent row can go.
#[async_trait]
pub trait CascadePolicy: EntityTrait {
    async fn delete_dependents(txn: &DatabaseTransaction, id: Uuid) -> Result<(), DbErr>;
}

/// Delete the posts matching `condition` together with their tag links.
async fn delete_posts_where(txn: &DatabaseTransaction, condition: SimpleExpr) -> Result<u64, DbErr> {
    let post_ids = post::Entity::find()
        .select_only()
        .column(post::Column::Id)
        .filter(condition.clone())
        .into_query();

    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.in_subquery(post_ids))
        .exec(txn)
        .await?;

    let result = post::Entity::delete_many()
        .filter(condition)
        .exec(txn)
        .await?;

    Ok(result.rows_affected)
}

#[async_trait]
impl CascadePolicy for category::Entity {
    async fn delete_dependents(txn: &DatabaseTransaction, id: Uuid) -> Result<(), DbErr> {
        let removed = delete_posts_where(txn, post::Column::CategoryId.eq(id)).await?;
        tracing::debug!(category_id = %id, posts = removed, "Cascading category delete");
        Ok(())
    }
}

#[async_trait]
impl CascadePolicy for author::Entity {
    async fn delete_dependents(txn: &DatabaseTransaction, id: Uuid) -> Result<(), DbErr> {
        let removed = delete_posts_where(txn, post::Column::AuthorId.eq(id)).await?;
        tracing::debug!(author_id = %id, posts = removed, "Cascading author delete");
        Ok(())
    }
}

#[async_trait]
impl CascadePolicy for tag::Entity {
    async fn delete_dependents(txn: &DatabaseTransaction, id: Uuid) -> Result<(), DbErr> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CascadePolicy for post::Entity {
    async fn delete_dependents(txn: &DatabaseTransaction, id: Uuid) -> Result<(), DbErr> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }
}
