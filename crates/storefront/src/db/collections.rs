//! Collection repository.

use sqlx::PgPool;

use briklyst_core::{CollectionId, StorefrontId};

use super::{CollectionStore, RepositoryError};
use crate::models::{Collection, CollectionInput};

const COLLECTION_COLUMNS: &str = "id, storefront_id, name, description, position, created_at";

#[derive(Clone, Copy)]
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CollectionStore for CollectionRepository<'_> {
    async fn list(&self, storefront_id: StorefrontId) -> Result<Vec<Collection>, RepositoryError> {
        let sql = format!(
            "SELECT {COLLECTION_COLUMNS} FROM collections \
             WHERE storefront_id = $1 \
             ORDER BY position, id"
        );
        Ok(sqlx::query_as::<_, Collection>(&sql)
            .bind(storefront_id)
            .fetch_all(self.pool)
            .await?)
    }

    async fn exists(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
    ) -> Result<bool, RepositoryError> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM collections WHERE id = $1 AND storefront_id = $2)",
        )
        .bind(id)
        .bind(storefront_id)
        .fetch_one(self.pool)
        .await?;
        Ok(found)
    }

    async fn create(
        &self,
        storefront_id: StorefrontId,
        input: &CollectionInput,
    ) -> Result<Collection, RepositoryError> {
        let sql = format!(
            "INSERT INTO collections (storefront_id, name, description, position) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLLECTION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Collection>(&sql)
            .bind(storefront_id)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.position)
            .fetch_one(self.pool)
            .await?)
    }

    async fn update(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
        input: &CollectionInput,
    ) -> Result<Option<Collection>, RepositoryError> {
        let sql = format!(
            "UPDATE collections SET name = $3, description = $4, position = $5 \
             WHERE id = $1 AND storefront_id = $2 \
             RETURNING {COLLECTION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Collection>(&sql)
            .bind(id)
            .bind(storefront_id)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.position)
            .fetch_optional(self.pool)
            .await?)
    }

    /// Products in the collection are kept; `ON DELETE SET NULL` detaches them.
    async fn delete(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1 AND storefront_id = $2")
            .bind(id)
            .bind(storefront_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
