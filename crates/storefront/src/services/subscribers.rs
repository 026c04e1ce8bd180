//! Mailing-list signups.

use serde::Serialize;

use briklyst_core::style::EmailTheme;
use briklyst_core::{Email, StorefrontId, UserId, resolve};

use super::email::{self, Mailer};
use super::settings::flatten;
use crate::db::{StorefrontStore, SubscriberStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::Subscriber;

/// Response to a signup: the storefront's configured success message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeOutcome {
    pub message: String,
}

pub struct SubscriberService<S, Sub, U, M> {
    storefronts: S,
    subscribers: Sub,
    users: U,
    mailer: M,
}

impl<S, Sub, U, M> SubscriberService<S, Sub, U, M>
where
    S: StorefrontStore,
    Sub: SubscriberStore,
    U: UserStore,
    M: Mailer,
{
    #[must_use]
    pub const fn new(storefronts: S, subscribers: Sub, users: U, mailer: M) -> Self {
        Self {
            storefronts,
            subscribers,
            users,
            mailer,
        }
    }

    /// Add `email` to a storefront's list. Signing up twice is not an error.
    ///
    /// A welcome email goes out on the first signup only; delivery problems
    /// are logged and do not fail the signup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a malformed address and
    /// `AppError::NotFound` for an unknown storefront.
    #[tracing::instrument(skip(self, raw_email, base_url))]
    pub async fn subscribe(
        &self,
        storefront_id: StorefrontId,
        raw_email: &str,
        base_url: &str,
    ) -> Result<SubscribeOutcome> {
        let email = Email::parse(raw_email)
            .map_err(|_| AppError::Validation("Invalid email address".to_string()))?;
        let storefront = self
            .storefronts
            .find_by_id(storefront_id)
            .await?
            .ok_or(AppError::NotFound("Storefront"))?;

        let settings = self.storefronts.settings(storefront.user_id).await?;
        let presentation = resolve(settings.as_ref());
        let message = presentation.subscriber_capture.success_message.clone();

        let added = self.subscribers.add(storefront.id, &email).await?;
        if added {
            tracing::info!("Subscriber added");
            if let Some(owner) = self.users.find_by_id(storefront.user_id).await? {
                let theme = EmailTheme::new(&presentation, storefront.title.clone());
                let storefront_url = format!("{base_url}/s/{}", owner.username);
                let sent = match email::subscriber_welcome(email.as_str(), &theme, &message, &storefront_url) {
                    Ok(welcome) => self.mailer.send(welcome).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = sent {
                    tracing::warn!(error = %e, "Failed to send subscriber welcome");
                }
            }
        }

        Ok(SubscribeOutcome { message })
    }

    /// Subscribers of the owner's storefront, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Subscriber>> {
        let storefront = self.storefronts.ensure(user_id, flatten).await?;
        Ok(self.subscribers.list(storefront.id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::services::email::RecordingMailer;
    use crate::services::settings::SettingsService;

    fn service(
        store: &MemoryStore,
        mailer: RecordingMailer,
    ) -> SubscriberService<MemoryStore, MemoryStore, MemoryStore, RecordingMailer> {
        SubscriberService::new(store.clone(), store.clone(), store.clone(), mailer)
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let storefront = StorefrontStore::ensure(&store, owner.id, flatten).await.unwrap();
        let mailer = RecordingMailer::default();
        let service = service(&store, mailer.clone());

        let first = service
            .subscribe(storefront.id, "Fan@Example.com", "https://briklyst.com")
            .await
            .unwrap();
        let again = service
            .subscribe(storefront.id, "fan@example.com", "https://briklyst.com")
            .await
            .unwrap();
        assert_eq!(first.message, "Thanks for subscribing!");
        assert_eq!(first, again);

        assert_eq!(service.list(owner.id).await.unwrap().len(), 1);
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_success_message() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let view = SettingsService::new(store.clone())
            .apply(
                owner.id,
                serde_json::from_value(json!({
                    "subscriberCapture": {"enabled": true, "successMessage": "You're in!"}
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        let outcome = service(&store, RecordingMailer::default())
            .subscribe(view.storefront.id, "fan@example.com", "https://briklyst.com")
            .await
            .unwrap();
        assert_eq!(outcome.message, "You're in!");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let storefront = StorefrontStore::ensure(&store, owner.id, flatten).await.unwrap();
        let err = service(&store, RecordingMailer::default())
            .subscribe(storefront.id, "not-an-email", "https://briklyst.com")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address");
    }

    #[tokio::test]
    async fn test_unknown_storefront() {
        let store = MemoryStore::new();
        let err = service(&store, RecordingMailer::default())
            .subscribe(StorefrontId::new(404), "fan@example.com", "https://briklyst.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Storefront")));
    }

    #[tokio::test]
    async fn test_welcome_failure_does_not_fail_signup() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let storefront = StorefrontStore::ensure(&store, owner.id, flatten).await.unwrap();
        let outcome = service(&store, RecordingMailer::failing())
            .subscribe(storefront.id, "fan@example.com", "https://briklyst.com")
            .await;
        assert!(outcome.is_ok());
    }
}
