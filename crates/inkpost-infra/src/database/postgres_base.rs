use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, TransactionTrait,
};
use uuid::Uuid;

use inkpost_core::domain::Identified;
use inkpost_core::error::RepoError;
use inkpost_core::ports::BaseRepository;

use super::cascade::CascadePolicy;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

pub(crate) fn query_error(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

pub(crate) fn write_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") || err_str.contains("foreign key")
    {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, Uuid> for PostgresBaseRepository<E>
where
    E: EntityTrait + CascadePolicy,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    T: Identified + From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let exists = E::find_by_id(entity.id())
            .one(&self.db)
            .await
            .map_err(query_error)?
            .is_some();

        let active_model: E::ActiveModel = entity.into();
        let model = if exists {
            active_model.update(&self.db).await
        } else {
            active_model.insert(&self.db).await
        }
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        E::delete_dependents(&txn, id).await.map_err(write_error)?;
        let result = E::delete_by_id(id).exec(&txn).await.map_err(write_error)?;

        if result.rows_affected == 0 {
            // Dropping the transaction rolls it back.
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_error)?;
        Ok(())
    }
}
