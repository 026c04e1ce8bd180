//! Public storefront presentation.
//!
//! Looks a storefront up, resolves its settings and shapes the view model
//! shared by `GET /api/storefronts` and the rendered `/s/{username}` page.
//! The raw override tree, owner identity and deleted products never leave
//! this module.

use serde::Serialize;

use briklyst_core::{UserId, resolve_with_assets};

use super::settings::{PresentationStyle, flatten};
use crate::db::{ProductStore, StorefrontStore};
use crate::error::{AppError, Result};
use crate::models::{PublicProduct, Storefront};

/// How the caller identified the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// By owner id. Never creates a storefront.
    Owner(UserId),
    /// By the owner's public handle.
    Username(String),
    /// The session user's own storefront, created on first access.
    Current(Option<UserId>),
}

impl Lookup {
    /// Build a lookup from the `userId`, `username` and `current` query keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when no key was given.
    pub fn from_params(
        user_id: Option<UserId>,
        username: Option<String>,
        current: bool,
        session_user: Option<UserId>,
    ) -> Result<Self> {
        if let Some(id) = user_id {
            return Ok(Self::Owner(id));
        }
        if let Some(name) = username.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            return Ok(Self::Username(name));
        }
        if current {
            return Ok(Self::Current(session_user));
        }
        Err(AppError::Validation("identification required".to_string()))
    }
}

/// Everything a visitor sees of a storefront.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontView {
    pub storefront: Storefront,
    #[serde(flatten)]
    pub presentation: PresentationStyle,
    pub products: Vec<PublicProduct>,
}

pub struct PresentationService<S, P> {
    storefronts: S,
    products: P,
}

impl<S: StorefrontStore, P: ProductStore> PresentationService<S, P> {
    #[must_use]
    pub const fn new(storefronts: S, products: P) -> Self {
        Self {
            storefronts,
            products,
        }
    }

    /// Resolve the storefront identified by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` for `Current(None)` and
    /// `AppError::NotFound` when nothing matches.
    #[tracing::instrument(skip(self))]
    pub async fn get_presentation(&self, lookup: Lookup) -> Result<StorefrontView> {
        let storefront = match lookup {
            Lookup::Owner(user_id) => self.storefronts.find_by_user(user_id).await?,
            Lookup::Username(username) => self.storefronts.find_by_username(&username).await?,
            Lookup::Current(None) => return Err(AppError::Unauthorized),
            Lookup::Current(Some(user_id)) => Some(self.storefronts.ensure(user_id, flatten).await?),
        }
        .ok_or(AppError::NotFound("Storefront"))?;

        let settings = self.storefronts.settings(storefront.user_id).await?;
        let presentation = resolve_with_assets(settings.as_ref(), storefront.assets()).into();

        let products = self
            .products
            .list(storefront.id)
            .await?
            .into_iter()
            .map(PublicProduct::from)
            .collect();

        Ok(StorefrontView {
            storefront,
            presentation,
            products,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::ProductInput;
    use crate::services::products::ProductService;
    use crate::services::settings::SettingsService;

    #[test]
    fn test_lookup_requires_a_key() {
        let err = Lookup::from_params(None, Some("  ".to_string()), false, None).unwrap_err();
        assert_eq!(err.to_string(), "identification required");
        assert_eq!(
            Lookup::from_params(None, None, true, None).unwrap(),
            Lookup::Current(None)
        );
    }

    #[tokio::test]
    async fn test_current_without_session_is_unauthorized() {
        let store = MemoryStore::new();
        let service = PresentationService::new(store.clone(), store);
        let err = service
            .get_presentation(Lookup::Current(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_current_ensures_storefront_once() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let service = PresentationService::new(store.clone(), store.clone());

        let first = service
            .get_presentation(Lookup::Current(Some(owner.id)))
            .await
            .unwrap();
        let second = service
            .get_presentation(Lookup::Current(Some(owner.id)))
            .await
            .unwrap();
        assert_eq!(first.storefront.id, second.storefront.id);
        assert_eq!(first.storefront.title, "noir");
    }

    #[tokio::test]
    async fn test_unknown_username_not_found() {
        let store = MemoryStore::new();
        let service = PresentationService::new(store.clone(), store);
        let err = service
            .get_presentation(Lookup::Username("ghost".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("Storefront")));
    }

    #[tokio::test]
    async fn test_owner_lookup_does_not_create() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        let service = PresentationService::new(store.clone(), store);
        let err = service
            .get_presentation(Lookup::Owner(owner.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_view_hides_deleted_products_and_resolves_theme() {
        let store = MemoryStore::new();
        let owner = store.seed_user("owner@example.com", "noir");
        SettingsService::new(store.clone())
            .apply(
                owner.id,
                serde_json::from_value(json!({"templateId": "sleek-noir"})).unwrap(),
            )
            .await
            .unwrap();

        let products = ProductService::new(store.clone(), store.clone(), store.clone());
        let input = |title: &str| -> ProductInput {
            serde_json::from_value(json!({
                "title": title,
                "price": "10",
                "affiliateUrl": "https://shop.example.com/item"
            }))
            .unwrap()
        };
        let kept = products.create(owner.id, input("Kept")).await.unwrap();
        let gone = products.create(owner.id, input("Gone")).await.unwrap();
        products.delete(owner.id, gone.id).await.unwrap();

        let service = PresentationService::new(store.clone(), store);
        let view = service
            .get_presentation(Lookup::Username("Noir".to_string()))
            .await
            .unwrap();
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products.first().unwrap().id, kept.id);
        assert_eq!(view.presentation.resolved.colors.primary, "#111112");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("settings").is_none());
        assert!(json["storefront"].get("userId").is_none());
        assert!(json["products"][0].get("affiliateUrl").is_none());
    }
}
