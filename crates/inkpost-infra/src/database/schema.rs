//! Table creation from the entity definitions.
//!
//! Creates whatever is missing; existing tables are left alone.

use sea_orm::{ConnectionTrait, DbConn, DbErr, Schema};

use super::entity::{author, category, post, post_tag, tag};

pub async fn create_tables(db: &DbConn) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents before children so foreign keys resolve.
    let mut statements = vec![
        schema.create_table_from_entity(author::Entity),
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(tag::Entity),
        schema.create_table_from_entity(post::Entity),
        schema.create_table_from_entity(post_tag::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    tracing::info!("Database schema ensured");
    Ok(())
}
