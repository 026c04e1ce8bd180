//! Product repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use briklyst_core::{ProductId, StorefrontId};

use super::{ProductStore, RepositoryError};
use crate::models::Product;
use crate::models::product::NewProduct;

const PRODUCT_COLUMNS: &str = "id, storefront_id, collection_id, title, description, price, \
     image_url, affiliate_url, clicks, created_at, deleted_at";

#[derive(Clone, Copy)]
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count live products across all storefronts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_live(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

impl ProductStore for ProductRepository<'_> {
    async fn list(&self, storefront_id: StorefrontId) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE storefront_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(storefront_id)
            .fetch_all(self.pool)
            .await?)
    }

    async fn create(
        &self,
        storefront_id: StorefrontId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products \
                 (storefront_id, collection_id, title, description, price, image_url, affiliate_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(storefront_id)
            .bind(product.collection_id)
            .bind(&product.title)
            .bind(product.description.as_deref())
            .bind(Decimal::from(product.price))
            .bind(product.image_url.as_deref())
            .bind(&product.affiliate_url)
            .fetch_one(self.pool)
            .await?)
    }

    async fn update(
        &self,
        storefront_id: StorefrontId,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "UPDATE products SET \
                 collection_id = $3, title = $4, description = $5, price = $6, \
                 image_url = $7, affiliate_url = $8 \
             WHERE id = $1 AND storefront_id = $2 AND deleted_at IS NULL \
             RETURNING {PRODUCT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(storefront_id)
            .bind(product.collection_id)
            .bind(&product.title)
            .bind(product.description.as_deref())
            .bind(Decimal::from(product.price))
            .bind(product.image_url.as_deref())
            .bind(&product.affiliate_url)
            .fetch_optional(self.pool)
            .await?)
    }

    async fn soft_delete(
        &self,
        storefront_id: StorefrontId,
        id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products SET deleted_at = NOW()
            WHERE id = $1 AND storefront_id = $2 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .bind(storefront_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
