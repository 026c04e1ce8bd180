//! Queries backing the weekly owner report.

use sqlx::PgPool;

use briklyst_core::StorefrontId;

use super::{ReportRecipient, ReportStore, RepositoryError, WeeklyStats};

#[derive(Clone, Copy)]
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ReportStore for ReportRepository<'_> {
    async fn weekly_recipients(&self) -> Result<Vec<ReportRecipient>, RepositoryError> {
        Ok(sqlx::query_as::<_, ReportRecipient>(
            r"
            SELECT u.id AS user_id, u.email, u.username,
                   s.id AS storefront_id, s.title AS storefront_title
            FROM users u
            JOIN storefronts s ON s.user_id = u.id
            WHERE u.weekly_report
            ORDER BY u.id
            ",
        )
        .fetch_all(self.pool)
        .await?)
    }

    async fn weekly_stats(&self, storefront_id: StorefrontId) -> Result<WeeklyStats, RepositoryError> {
        let clicks: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM click_events e
            JOIN products p ON p.id = e.product_id
            WHERE p.storefront_id = $1 AND e.created_at > NOW() - INTERVAL '7 days'
            ",
        )
        .bind(storefront_id)
        .fetch_one(self.pool)
        .await?;

        let new_subscribers: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM subscribers
            WHERE storefront_id = $1 AND created_at > NOW() - INTERVAL '7 days'
            ",
        )
        .bind(storefront_id)
        .fetch_one(self.pool)
        .await?;

        let top_products: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT p.title, COUNT(e.id) AS clicks
            FROM click_events e
            JOIN products p ON p.id = e.product_id
            WHERE p.storefront_id = $1 AND e.created_at > NOW() - INTERVAL '7 days'
            GROUP BY p.id, p.title
            ORDER BY clicks DESC, p.id
            LIMIT 5
            ",
        )
        .bind(storefront_id)
        .fetch_all(self.pool)
        .await?;

        Ok(WeeklyStats {
            clicks,
            new_subscribers,
            top_products,
        })
    }
}
