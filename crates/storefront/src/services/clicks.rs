//! Outbound click tracking and owner click alerts.

use briklyst_core::style::EmailTheme;
use briklyst_core::{ProductId, UserId, resolve};

use super::email::{self, Mailer};
use super::settings::flatten;
use crate::db::{ClickStore, ClickTarget, StorefrontStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::ProductClicks;

/// Longest referrer kept on a click event.
const MAX_REFERRER: usize = 512;

pub struct ClickService<C, U, S, M> {
    clicks: C,
    users: U,
    storefronts: S,
    mailer: M,
}

impl<C, U, S, M> ClickService<C, U, S, M>
where
    C: ClickStore,
    U: UserStore,
    S: StorefrontStore,
    M: Mailer,
{
    #[must_use]
    pub const fn new(clicks: C, users: U, storefronts: S, mailer: M) -> Self {
        Self {
            clicks,
            users,
            storefronts,
            mailer,
        }
    }

    /// Count a click and return where to send the visitor.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for a missing or deleted product.
    #[tracing::instrument(skip(self, referrer))]
    pub async fn record(
        &self,
        product_id: ProductId,
        visitor: Option<UserId>,
        referrer: Option<&str>,
    ) -> Result<ClickTarget> {
        let referrer = referrer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| r.chars().take(MAX_REFERRER).collect::<String>());
        let target = self
            .clicks
            .record(product_id, visitor, referrer.as_deref())
            .await?
            .ok_or(AppError::NotFound("Product"))?;
        tracing::debug!(clicks = target.clicks, "Click recorded");
        Ok(target)
    }

    /// Email the owner about a click if they opted in.
    ///
    /// Never fails: problems are logged and the click stands.
    pub async fn notify_owner(&self, target: &ClickTarget, base_url: &str) {
        if let Err(e) = self.try_notify_owner(target, base_url).await {
            tracing::warn!(
                error = %e,
                product_id = %target.product_id,
                "Failed to send click alert"
            );
        }
    }

    async fn try_notify_owner(&self, target: &ClickTarget, base_url: &str) -> Result<()> {
        let Some(owner) = self.users.find_by_id(target.owner_id).await? else {
            return Ok(());
        };
        if !owner.click_alerts {
            return Ok(());
        }
        let storefront = self.storefronts.ensure(owner.id, flatten).await?;
        let settings = self.storefronts.settings(owner.id).await?;
        let theme = EmailTheme::new(&resolve(settings.as_ref()), storefront.title);

        let message = email::click_alert(
            owner.email.as_str(),
            &theme,
            &target.product_title,
            target.clicks,
            target.clicked_at,
            base_url,
        )?;
        self.mailer.send(message).await?;
        Ok(())
    }

    /// Per-product click totals for the owner's storefront.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn totals(&self, user_id: UserId) -> Result<Vec<ProductClicks>> {
        let storefront = self.storefronts.ensure(user_id, flatten).await?;
        Ok(self.clicks.totals(storefront.id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::db::NotificationPreferences;
    use crate::db::memory::MemoryStore;
    use crate::models::Product;
    use crate::services::email::RecordingMailer;
    use crate::services::products::ProductService;

    async fn product(store: &MemoryStore, owner: UserId) -> Product {
        ProductService::new(store.clone(), store.clone(), store.clone())
            .create(
                owner,
                serde_json::from_value(json!({
                    "title": "Leather tote",
                    "price": "89",
                    "affiliateUrl": "https://shop.example.com/tote"
                }))
                .unwrap(),
            )
            .await
            .unwrap()
    }

    fn service(
        store: &MemoryStore,
        mailer: RecordingMailer,
    ) -> ClickService<MemoryStore, MemoryStore, MemoryStore, RecordingMailer> {
        ClickService::new(store.clone(), store.clone(), store.clone(), mailer)
    }

    #[tokio::test]
    async fn test_record_increments_and_logs_event() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let product = product(&store, owner.id).await;
        let service = service(&store, RecordingMailer::default());

        let first = service.record(product.id, None, None).await.unwrap();
        let second = service
            .record(product.id, Some(owner.id), Some("https://instagram.com/"))
            .await
            .unwrap();
        assert_eq!(first.clicks, 1);
        assert_eq!(second.clicks, 2);
        assert_eq!(second.affiliate_url, "https://shop.example.com/tote");

        let events = store.click_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events.first().unwrap().user_id, None);
        assert_eq!(events.get(1).unwrap().user_id, Some(owner.id));
    }

    #[tokio::test]
    async fn test_unknown_product_not_found() {
        let store = MemoryStore::new();
        let service = service(&store, RecordingMailer::default());
        let err = service
            .record(ProductId::new(999), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Product")));
    }

    #[tokio::test]
    async fn test_click_alert_sent_to_owner() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let product = product(&store, owner.id).await;
        let mailer = RecordingMailer::default();
        let service = service(&store, mailer.clone());

        let target = service.record(product.id, None, None).await.unwrap();
        service.notify_owner(&target, "https://briklyst.com").await;

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent.first().unwrap().to, "owner@example.com");
        assert_eq!(sent.first().unwrap().subject, "New click on Leather tote");
        let stamp = target.clicked_at.format("%Y-%m-%d %H:%M UTC").to_string();
        assert!(sent.first().unwrap().text.contains(&stamp));
    }

    #[tokio::test]
    async fn test_no_alert_after_opt_out() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        UserStore::update_notifications(
            &store,
            owner.id,
            &NotificationPreferences {
                click_alerts: Some(false),
                ..NotificationPreferences::default()
            },
        )
        .await
        .unwrap();
        let product = product(&store, owner.id).await;
        let mailer = RecordingMailer::default();
        let service = service(&store, mailer.clone());

        let target = service.record(product.id, None, None).await.unwrap();
        service.notify_owner(&target, "https://briklyst.com").await;
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_click_alert_failure_is_swallowed() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let product = product(&store, owner.id).await;
        let service = service(&store, RecordingMailer::failing());

        let target = service.record(product.id, None, None).await.unwrap();
        service.notify_owner(&target, "https://briklyst.com").await;
        assert_eq!(store.click_events().len(), 1);
    }

    #[tokio::test]
    async fn test_totals_count_recent_events() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let product = product(&store, owner.id).await;
        let service = service(&store, RecordingMailer::default());

        service.record(product.id, None, None).await.unwrap();
        store.age_clicks(Duration::days(8));
        service.record(product.id, None, None).await.unwrap();

        let totals = service.totals(owner.id).await.unwrap();
        let row = totals.first().unwrap();
        assert_eq!(row.clicks, 2);
        assert_eq!(row.clicks_last_7_days, 1);
    }
}
