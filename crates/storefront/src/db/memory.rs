//! In-memory implementation of every store trait, for service tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};

use briklyst_core::{
    ClickId, CollectionId, Email, FlattenedTheme, ProductId, SettingsPatch, StorefrontId,
    StorefrontSettings, SubscriberId, UserId,
};

use super::{
    ClickStore, ClickTarget, CollectionStore, NewUser, NotificationPreferences, ProductStore,
    ReportRecipient, ReportStore, RepositoryError, StorefrontStore, SubscriberStore, UserStore,
    WeeklyStats,
};
use crate::models::product::NewProduct;
use crate::models::storefront::IdentityUpdate;
use crate::models::{
    ClickEvent, Collection, CollectionInput, Product, ProductClicks, Storefront, Subscriber, User,
};

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<(User, String)>,
    storefronts: Vec<Storefront>,
    settings: HashMap<UserId, StorefrontSettings>,
    products: Vec<Product>,
    collections: Vec<Collection>,
    subscribers: Vec<Subscriber>,
    clicks: Vec<ClickEvent>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn storefront_mut(&mut self, user_id: UserId) -> Option<&mut Storefront> {
        self.storefronts.iter_mut().find(|s| s.user_id == user_id)
    }

    fn ensure(&mut self, user_id: UserId, baseline: &FlattenedTheme) -> Result<Storefront, RepositoryError> {
        if let Some(existing) = self.storefronts.iter().find(|s| s.user_id == user_id) {
            return Ok(existing.clone());
        }
        let username = self
            .users
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(u, _)| u.username.clone())
            .ok_or(RepositoryError::NotFound)?;
        let now = Utc::now();
        let storefront = Storefront {
            id: StorefrontId::new(self.next_id()),
            user_id,
            title: username,
            description: None,
            domain: None,
            logo_url: None,
            banner_url: None,
            primary_color: baseline.primary_color.clone(),
            accent_color: baseline.accent_color.clone(),
            background_color: baseline.background_color.clone(),
            text_color: baseline.text_color.clone(),
            font_family: baseline.font_family.clone(),
            theme_id: baseline.theme_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.storefronts.push(storefront.clone());
        self.settings.entry(user_id).or_insert_with(StorefrontSettings::baseline);
        Ok(storefront)
    }

    fn merge_settings<F>(
        &mut self,
        user_id: UserId,
        patch: &SettingsPatch,
        flatten: &F,
    ) -> Result<(Storefront, StorefrontSettings), RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme,
    {
        let settings = self.settings.entry(user_id).or_default();
        settings.apply(patch.clone());
        let settings = settings.clone();

        let flat = flatten(&settings);
        let storefront = self.storefront_mut(user_id).ok_or(RepositoryError::NotFound)?;
        storefront.primary_color = flat.primary_color;
        storefront.accent_color = flat.accent_color;
        storefront.background_color = flat.background_color;
        storefront.text_color = flat.text_color;
        storefront.font_family = flat.font_family;
        storefront.theme_id = flat.theme_id;
        storefront.updated_at = Utc::now();
        Ok((storefront.clone(), settings))
    }
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Create a user directly, bypassing password hashing.
    pub fn seed_user(&self, email: &str, username: &str) -> User {
        let mut state = self.state();
        let user = User {
            id: UserId::new(state.next_id()),
            email: Email::parse(email).unwrap(),
            username: username.to_string(),
            name: None,
            weekly_report: true,
            click_alerts: true,
            created_at: Utc::now(),
        };
        state.users.push((user.clone(), String::new()));
        user
    }

    /// Move every recorded click back in time.
    pub fn age_clicks(&self, by: Duration) {
        for click in &mut self.state().clicks {
            click.created_at -= by;
        }
    }

    pub fn click_events(&self) -> Vec<ClickEvent> {
        self.state().clicks.clone()
    }

    pub fn all_products(&self) -> Vec<Product> {
        self.state().products.clone()
    }
}

impl UserStore for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state();
        if state
            .users
            .iter()
            .any(|(u, _)| u.email == user.email || u.username == user.username)
        {
            return Err(RepositoryError::Conflict("user already exists".to_string()));
        }
        let created = User {
            id: UserId::new(state.next_id()),
            email: user.email.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            weekly_report: true,
            click_alerts: true,
            created_at: Utc::now(),
        };
        state.users.push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|(u, _)| &u.email == email)
            .cloned())
    }

    async fn update_notifications(
        &self,
        id: UserId,
        preferences: &NotificationPreferences,
    ) -> Result<Option<User>, RepositoryError> {
        let mut state = self.state();
        let Some((user, _)) = state.users.iter_mut().find(|(u, _)| u.id == id) else {
            return Ok(None);
        };
        if let Some(weekly_report) = preferences.weekly_report {
            user.weekly_report = weekly_report;
        }
        if let Some(click_alerts) = preferences.click_alerts {
            user.click_alerts = click_alerts;
        }
        Ok(Some(user.clone()))
    }
}

impl StorefrontStore for MemoryStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Storefront>, RepositoryError> {
        Ok(self
            .state()
            .storefronts
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Storefront>, RepositoryError> {
        let state = self.state();
        let username = username.to_ascii_lowercase();
        let Some(user_id) = state
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.id)
        else {
            return Ok(None);
        };
        Ok(state.storefronts.iter().find(|s| s.user_id == user_id).cloned())
    }

    async fn find_by_id(&self, id: StorefrontId) -> Result<Option<Storefront>, RepositoryError> {
        Ok(self.state().storefronts.iter().find(|s| s.id == id).cloned())
    }

    async fn ensure<F>(&self, user_id: UserId, flatten: F) -> Result<Storefront, RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync,
    {
        let baseline = flatten(&StorefrontSettings::baseline());
        self.state().ensure(user_id, &baseline)
    }

    async fn settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<StorefrontSettings>, RepositoryError> {
        Ok(self.state().settings.get(&user_id).cloned())
    }

    async fn apply_settings<F>(
        &self,
        user_id: UserId,
        patch: &SettingsPatch,
        flatten: F,
    ) -> Result<(Storefront, StorefrontSettings), RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync,
    {
        let baseline = flatten(&StorefrontSettings::baseline());
        let mut state = self.state();
        state.ensure(user_id, &baseline)?;
        state.merge_settings(user_id, patch, &flatten)
    }

    async fn save_details<F>(
        &self,
        user_id: UserId,
        identity: &IdentityUpdate,
        patch: &SettingsPatch,
        flatten: F,
    ) -> Result<(Storefront, StorefrontSettings), RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync,
    {
        let baseline = flatten(&StorefrontSettings::baseline());
        let mut state = self.state();
        state.ensure(user_id, &baseline)?;

        if let Some(domain) = identity.domain.as_deref().filter(|d| !d.is_empty())
            && state
                .storefronts
                .iter()
                .any(|s| s.user_id != user_id && s.domain.as_deref() == Some(domain))
        {
            return Err(RepositoryError::Conflict("domain already exists".to_string()));
        }

        if !identity.is_empty() {
            let storefront = state.storefront_mut(user_id).ok_or(RepositoryError::NotFound)?;
            let clearable = |current: &mut Option<String>, next: Option<&String>| {
                if let Some(next) = next {
                    *current = Some(next.clone()).filter(|v| !v.is_empty());
                }
            };
            if let Some(title) = &identity.title {
                storefront.title.clone_from(title);
            }
            clearable(&mut storefront.description, identity.description.as_ref());
            clearable(&mut storefront.domain, identity.domain.as_ref());
            clearable(&mut storefront.logo_url, identity.logo_url.as_ref());
            clearable(&mut storefront.banner_url, identity.banner_url.as_ref());
            storefront.updated_at = Utc::now();
        }

        if patch.is_empty() {
            let storefront = state
                .storefront_mut(user_id)
                .ok_or(RepositoryError::NotFound)?
                .clone();
            let settings = state.settings.get(&user_id).cloned().unwrap_or_default();
            Ok((storefront, settings))
        } else {
            state.merge_settings(user_id, patch, &flatten)
        }
    }
}

impl ProductStore for MemoryStore {
    async fn list(&self, storefront_id: StorefrontId) -> Result<Vec<Product>, RepositoryError> {
        let mut products: Vec<Product> = self
            .state()
            .products
            .iter()
            .filter(|p| p.storefront_id == storefront_id && p.deleted_at.is_none())
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn create(
        &self,
        storefront_id: StorefrontId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let mut state = self.state();
        let created = Product {
            id: ProductId::new(state.next_id()),
            storefront_id,
            collection_id: product.collection_id,
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            affiliate_url: product.affiliate_url.clone(),
            clicks: 0,
            created_at: Utc::now(),
            deleted_at: None,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        storefront_id: StorefrontId,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut state = self.state();
        let Some(existing) = state
            .products
            .iter_mut()
            .find(|p| p.id == id && p.storefront_id == storefront_id && p.deleted_at.is_none())
        else {
            return Ok(None);
        };
        existing.collection_id = product.collection_id;
        existing.title.clone_from(&product.title);
        existing.description.clone_from(&product.description);
        existing.price = product.price;
        existing.image_url.clone_from(&product.image_url);
        existing.affiliate_url.clone_from(&product.affiliate_url);
        Ok(Some(existing.clone()))
    }

    async fn soft_delete(
        &self,
        storefront_id: StorefrontId,
        id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state();
        let Some(existing) = state
            .products
            .iter_mut()
            .find(|p| p.id == id && p.storefront_id == storefront_id && p.deleted_at.is_none())
        else {
            return Ok(false);
        };
        existing.deleted_at = Some(Utc::now());
        Ok(true)
    }
}

impl CollectionStore for MemoryStore {
    async fn list(&self, storefront_id: StorefrontId) -> Result<Vec<Collection>, RepositoryError> {
        let mut collections: Vec<Collection> = self
            .state()
            .collections
            .iter()
            .filter(|c| c.storefront_id == storefront_id)
            .cloned()
            .collect();
        collections.sort_by_key(|c| (c.position, c.id));
        Ok(collections)
    }

    async fn exists(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .state()
            .collections
            .iter()
            .any(|c| c.id == id && c.storefront_id == storefront_id))
    }

    async fn create(
        &self,
        storefront_id: StorefrontId,
        input: &CollectionInput,
    ) -> Result<Collection, RepositoryError> {
        let mut state = self.state();
        let created = Collection {
            id: CollectionId::new(state.next_id()),
            storefront_id,
            name: input.name.clone(),
            description: input.description.clone(),
            position: input.position,
            created_at: Utc::now(),
        };
        state.collections.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
        input: &CollectionInput,
    ) -> Result<Option<Collection>, RepositoryError> {
        let mut state = self.state();
        let Some(existing) = state
            .collections
            .iter_mut()
            .find(|c| c.id == id && c.storefront_id == storefront_id)
        else {
            return Ok(None);
        };
        existing.name.clone_from(&input.name);
        existing.description.clone_from(&input.description);
        existing.position = input.position;
        Ok(Some(existing.clone()))
    }

    async fn delete(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state();
        let before = state.collections.len();
        state
            .collections
            .retain(|c| !(c.id == id && c.storefront_id == storefront_id));
        let deleted = state.collections.len() < before;
        if deleted {
            for product in &mut state.products {
                if product.collection_id == Some(id) {
                    product.collection_id = None;
                }
            }
        }
        Ok(deleted)
    }
}

impl ClickStore for MemoryStore {
    async fn record(
        &self,
        product_id: ProductId,
        visitor: Option<UserId>,
        referrer: Option<&str>,
    ) -> Result<Option<ClickTarget>, RepositoryError> {
        let mut state = self.state();
        let Some(product) = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id && p.deleted_at.is_none())
        else {
            return Ok(None);
        };
        product.clicks += 1;
        let (title, url, clicks, storefront_id) = (
            product.title.clone(),
            product.affiliate_url.clone(),
            product.clicks,
            product.storefront_id,
        );
        let owner_id = state
            .storefronts
            .iter()
            .find(|s| s.id == storefront_id)
            .map(|s| s.user_id)
            .ok_or(RepositoryError::NotFound)?;
        let id = ClickId::new(state.next_id());
        let clicked_at = Utc::now();
        state.clicks.push(ClickEvent {
            id,
            product_id,
            user_id: visitor,
            referrer: referrer.map(String::from),
            created_at: clicked_at,
        });
        Ok(Some(ClickTarget {
            product_id,
            product_title: title,
            affiliate_url: url,
            clicks,
            storefront_id,
            owner_id,
            clicked_at,
        }))
    }

    async fn totals(
        &self,
        storefront_id: StorefrontId,
    ) -> Result<Vec<ProductClicks>, RepositoryError> {
        let state = self.state();
        let cutoff = Utc::now() - Duration::days(7);
        let mut totals: Vec<ProductClicks> = state
            .products
            .iter()
            .filter(|p| p.storefront_id == storefront_id && p.deleted_at.is_none())
            .map(|p| ProductClicks {
                product_id: p.id,
                title: p.title.clone(),
                clicks: p.clicks,
                clicks_last_7_days: state
                    .clicks
                    .iter()
                    .filter(|c| c.product_id == p.id && c.created_at > cutoff)
                    .count()
                    .try_into()
                    .unwrap(),
            })
            .collect();
        totals.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.product_id.cmp(&b.product_id)));
        Ok(totals)
    }
}

impl SubscriberStore for MemoryStore {
    async fn add(&self, storefront_id: StorefrontId, email: &Email) -> Result<bool, RepositoryError> {
        let mut state = self.state();
        if state
            .subscribers
            .iter()
            .any(|s| s.storefront_id == storefront_id && &s.email == email)
        {
            return Ok(false);
        }
        let id = SubscriberId::new(state.next_id());
        state.subscribers.push(Subscriber {
            id,
            storefront_id,
            email: email.clone(),
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn list(&self, storefront_id: StorefrontId) -> Result<Vec<Subscriber>, RepositoryError> {
        let mut subscribers: Vec<Subscriber> = self
            .state()
            .subscribers
            .iter()
            .filter(|s| s.storefront_id == storefront_id)
            .cloned()
            .collect();
        subscribers.reverse();
        Ok(subscribers)
    }
}

impl ReportStore for MemoryStore {
    async fn weekly_recipients(&self) -> Result<Vec<ReportRecipient>, RepositoryError> {
        let state = self.state();
        Ok(state
            .users
            .iter()
            .filter(|(u, _)| u.weekly_report)
            .filter_map(|(u, _)| {
                let storefront = state.storefronts.iter().find(|s| s.user_id == u.id)?;
                Some(ReportRecipient {
                    user_id: u.id,
                    email: u.email.to_string(),
                    username: u.username.clone(),
                    storefront_id: storefront.id,
                    storefront_title: storefront.title.clone(),
                })
            })
            .collect())
    }

    async fn weekly_stats(&self, storefront_id: StorefrontId) -> Result<WeeklyStats, RepositoryError> {
        let state = self.state();
        let cutoff = Utc::now() - Duration::days(7);
        let mut per_product: Vec<(ProductId, String, i64)> = state
            .products
            .iter()
            .filter(|p| p.storefront_id == storefront_id)
            .map(|p| {
                let count = state
                    .clicks
                    .iter()
                    .filter(|c| c.product_id == p.id && c.created_at > cutoff)
                    .count();
                (p.id, p.title.clone(), i64::try_from(count).unwrap())
            })
            .filter(|(_, _, count)| *count > 0)
            .collect();
        per_product.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

        let new_subscribers = state
            .subscribers
            .iter()
            .filter(|s| s.storefront_id == storefront_id && s.created_at > cutoff)
            .count();

        Ok(WeeklyStats {
            clicks: per_product.iter().map(|(_, _, c)| c).sum(),
            new_subscribers: i64::try_from(new_subscribers).unwrap(),
            top_products: per_product
                .into_iter()
                .take(5)
                .map(|(_, title, clicks)| (title, clicks))
                .collect(),
        })
    }
}
