//! Click tracking repository.
//!
//! Every outbound click bumps `products.clicks` and appends a row to
//! `click_events` in the same transaction, so the counter and the event log
//! never drift apart.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use briklyst_core::{ProductId, StorefrontId, UserId};

use super::{ClickStore, ClickTarget, RepositoryError};
use crate::models::ProductClicks;

#[derive(Clone, Copy)]
pub struct ClickRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClickRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClickTargetRow {
    product_id: ProductId,
    product_title: String,
    affiliate_url: String,
    clicks: i64,
    storefront_id: StorefrontId,
    owner_id: UserId,
}

impl ClickTargetRow {
    fn into_target(self, clicked_at: DateTime<Utc>) -> ClickTarget {
        ClickTarget {
            product_id: self.product_id,
            product_title: self.product_title,
            affiliate_url: self.affiliate_url,
            clicks: self.clicks,
            storefront_id: self.storefront_id,
            owner_id: self.owner_id,
            clicked_at,
        }
    }
}

impl ClickStore for ClickRepository<'_> {
    async fn record(
        &self,
        product_id: ProductId,
        visitor: Option<UserId>,
        referrer: Option<&str>,
    ) -> Result<Option<ClickTarget>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ClickTargetRow>(
            r"
            UPDATE products p SET clicks = p.clicks + 1
            FROM storefronts s
            WHERE p.id = $1 AND p.deleted_at IS NULL AND s.id = p.storefront_id
            RETURNING p.id AS product_id, p.title AS product_title, p.affiliate_url,
                      p.clicks, p.storefront_id, s.user_id AS owner_id
            ",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let clicked_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r"
            INSERT INTO click_events (product_id, user_id, referrer)
            VALUES ($1, $2, $3)
            RETURNING created_at
            ",
        )
        .bind(product_id)
        .bind(visitor)
        .bind(referrer)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row.into_target(clicked_at)))
    }

    async fn totals(
        &self,
        storefront_id: StorefrontId,
    ) -> Result<Vec<ProductClicks>, RepositoryError> {
        Ok(sqlx::query_as::<_, ProductClicks>(
            r"
            SELECT p.id AS product_id, p.title, p.clicks,
                   COUNT(e.id) FILTER (WHERE e.created_at > NOW() - INTERVAL '7 days')
                       AS clicks_last_7_days
            FROM products p
            LEFT JOIN click_events e ON e.product_id = p.id
            WHERE p.storefront_id = $1 AND p.deleted_at IS NULL
            GROUP BY p.id
            ORDER BY p.clicks DESC, p.id
            ",
        )
        .bind(storefront_id)
        .fetch_all(self.pool)
        .await?)
    }
}
