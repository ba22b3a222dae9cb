#[cfg(test)]
mod tests {
    use crate::database::entity::{category, post, post_tag};
    use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};
    use chrono::{TimeZone, Utc};
    use inkpost_core::domain::{Category, Post};
    use inkpost_core::error::RepoError;
    use inkpost_core::ports::{BaseRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: uuid::Uuid, category_id: uuid::Uuid) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            title: "Test Post".to_owned(),
            body: "# Hello\nWorld".to_owned(),
            created_at: now.into(),
            modified_at: now.into(),
            excerpt: "Hello World".to_owned(),
            category_id,
            author_id: uuid::Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id_attaches_tags() {
        let post_id = uuid::Uuid::new_v4();
        let category_id = uuid::Uuid::new_v4();
        let tag_a = uuid::Uuid::new_v4();
        let tag_b = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, category_id)]])
            .append_query_results(vec![vec![
                post_tag::Model {
                    post_id,
                    tag_id: tag_a,
                },
                post_tag::Model {
                    post_id,
                    tag_id: tag_b,
                },
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let post = repo.find_by_id(post_id).await.unwrap().unwrap();

        assert_eq!(post.title, "Test Post");
        assert_eq!(post.category_id, category_id);
        assert_eq!(post.tag_ids, vec![tag_a, tag_b]);
    }

    #[tokio::test]
    async fn test_find_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_post_returns_stored_created_at() {
        let exec = |rows_affected| MockExecResult {
            last_insert_id: 0,
            rows_affected,
        };
        let category_id = uuid::Uuid::new_v4();
        let tag_id = uuid::Uuid::new_v4();
        let first_saved = Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0).unwrap();

        let draft = Post::new("Test Post", "# Hello\nWorld", category_id, uuid::Uuid::new_v4())
            .with_tags([tag_id]);
        let mut stored = post_model(draft.id, category_id);
        stored.author_id = draft.author_id;
        stored.created_at = first_saved.into();

        // upsert, clearing old links, inserting the new link, then the read-back.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec(1), exec(1), exec(1)])
            .append_query_results(vec![vec![stored]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved = repo.save(draft.stamp(Utc::now()).unwrap()).await.unwrap();

        assert_eq!(saved.created_at, first_saved);
        assert_eq!(saved.tag_ids, vec![tag_id]);
    }

    #[tokio::test]
    async fn test_find_category_by_id() {
        let id = uuid::Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id,
                name: "Rust".to_owned(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);
        let found: Option<Category> = repo.find_by_id(id).await.unwrap();

        assert_eq!(found.map(|c| c.name), Some("Rust".to_string()));
    }

    #[tokio::test]
    async fn test_delete_category_cascades_in_one_transaction() {
        let exec = |rows_affected| MockExecResult {
            last_insert_id: 0,
            rows_affected,
        };
        // post_tags of the category's posts, the posts, then the category row.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec(3), exec(2), exec(1)])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);
        let result = BaseRepository::<Category, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let exec = |rows_affected| MockExecResult {
            last_insert_id: 0,
            rows_affected,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec(0), exec(0), exec(0)])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);
        let result = BaseRepository::<Category, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
