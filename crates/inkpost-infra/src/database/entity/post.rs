//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(70))")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub excerpt: String,
    pub category_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
///
/// Tag ids live in `post_tags` and are filled in by the repository.
impl From<Model> for inkpost_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            created_at: model.created_at.into(),
            modified_at: model.modified_at.into(),
            excerpt: model.excerpt,
            category_id: model.category_id,
            tag_ids: Vec::new(),
            author_id: model.author_id,
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<&inkpost_core::domain::Post> for ActiveModel {
    fn from(post: &inkpost_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title.clone()),
            body: Set(post.body.clone()),
            created_at: Set(post.created_at.into()),
            modified_at: Set(post.modified_at.into()),
            excerpt: Set(post.excerpt.clone()),
            category_id: Set(post.category_id),
            author_id: Set(post.author_id),
        }
    }
}
