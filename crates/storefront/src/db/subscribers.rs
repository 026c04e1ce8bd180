//! Mailing-list subscribers.

use sqlx::PgPool;

use briklyst_core::{Email, StorefrontId, SubscriberId};

use super::{RepositoryError, SubscriberStore};
use crate::models::Subscriber;

#[derive(Clone, Copy)]
pub struct SubscriberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriberRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl SubscriberStore for SubscriberRepository<'_> {
    async fn add(&self, storefront_id: StorefrontId, email: &Email) -> Result<bool, RepositoryError> {
        let inserted: Option<SubscriberId> = sqlx::query_scalar(
            r"
            INSERT INTO subscribers (storefront_id, email)
            VALUES ($1, $2)
            ON CONFLICT (storefront_id, email) DO NOTHING
            RETURNING id
            ",
        )
        .bind(storefront_id)
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;
        Ok(inserted.is_some())
    }

    async fn list(&self, storefront_id: StorefrontId) -> Result<Vec<Subscriber>, RepositoryError> {
        Ok(sqlx::query_as::<_, Subscriber>(
            r"
            SELECT id, storefront_id, email, created_at
            FROM subscribers
            WHERE storefront_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(storefront_id)
        .fetch_all(self.pool)
        .await?)
    }
}
