//! Database operations for the Briklyst `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts and notification preferences
//! - `storefronts` - One per user, with the flattened presentation cache
//! - `storefront_settings` - One per storefront; overrides and content as JSONB
//! - `products` - Affiliate products (soft-deleted via `deleted_at`)
//! - `collections` - Owner-defined product groupings
//! - `subscribers` - Mailing-list signups, unique per storefront
//! - `click_events` - One row per outbound click
//! - `tower_sessions.session` - Session storage
//!
//! Services depend on the store traits below rather than on `PgPool`, so
//! they can be exercised against in-memory fakes.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p briklyst-cli -- migrate
//! ```

pub mod clicks;
pub mod collections;
#[cfg(test)]
pub mod memory;
pub mod products;
pub mod reports;
pub mod storefronts;
pub mod subscribers;
pub mod users;

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use briklyst_core::{
    CollectionId, Email, FlattenedTheme, ProductId, SettingsPatch, StorefrontId,
    StorefrontSettings, UserId,
};

use crate::models::product::NewProduct;
use crate::models::storefront::IdentityUpdate;
use crate::models::{
    Collection, CollectionInput, Product, ProductClicks, Storefront, Subscriber, User,
};

pub use clicks::ClickRepository;
pub use collections::CollectionRepository;
pub use products::ProductRepository;
pub use reports::ReportRepository;
pub use storefronts::StorefrontRepository;
pub use subscribers::SubscriberRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique violations to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(what: &str) -> impl FnOnce(sqlx::Error) -> RepositoryError + '_ {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        RepositoryError::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

type Res<T> = Result<T, RepositoryError>;

/// Data needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
}

pub trait UserStore: Send + Sync {
    fn create(&self, user: &NewUser) -> impl Future<Output = Res<User>> + Send;

    fn find_by_id(&self, id: UserId) -> impl Future<Output = Res<Option<User>>> + Send;

    /// The user and their password hash, for login.
    fn find_credentials(
        &self,
        email: &Email,
    ) -> impl Future<Output = Res<Option<(User, String)>>> + Send;

    /// Change the email opt-ins. `None` keeps the stored flag.
    fn update_notifications(
        &self,
        id: UserId,
        preferences: &NotificationPreferences,
    ) -> impl Future<Output = Res<Option<User>>> + Send;
}

/// Email opt-in changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub weekly_report: Option<bool>,
    pub click_alerts: Option<bool>,
}

/// Storefronts and their settings.
///
/// Writes that touch settings take a `flatten` function so the flattened
/// storefront columns are recomputed inside the same transaction.
pub trait StorefrontStore: Send + Sync {
    fn find_by_user(&self, user_id: UserId) -> impl Future<Output = Res<Option<Storefront>>> + Send;

    /// Look up by the owner's username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Res<Option<Storefront>>> + Send;

    fn find_by_id(&self, id: StorefrontId) -> impl Future<Output = Res<Option<Storefront>>> + Send;

    /// Create the storefront and its baseline settings if missing.
    ///
    /// Idempotent: concurrent calls for one user yield the same storefront.
    fn ensure<F>(&self, user_id: UserId, flatten: F) -> impl Future<Output = Res<Storefront>> + Send
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync;

    fn settings(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Res<Option<StorefrontSettings>>> + Send;

    /// Ensure the storefront, upsert-merge `patch` into its settings and
    /// rewrite the flattened columns, all in one transaction.
    fn apply_settings<F>(
        &self,
        user_id: UserId,
        patch: &SettingsPatch,
        flatten: F,
    ) -> impl Future<Output = Res<(Storefront, StorefrontSettings)>> + Send
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync;

    /// Ensure the storefront, then update title, description, domain and
    /// assets and merge `patch` as [`Self::apply_settings`] does, all in one
    /// transaction. A domain conflict writes nothing.
    fn save_details<F>(
        &self,
        user_id: UserId,
        identity: &IdentityUpdate,
        patch: &SettingsPatch,
        flatten: F,
    ) -> impl Future<Output = Res<(Storefront, StorefrontSettings)>> + Send
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync;
}

pub trait ProductStore: Send + Sync {
    /// Live products, newest first (`created_at DESC, id DESC`).
    fn list(&self, storefront_id: StorefrontId) -> impl Future<Output = Res<Vec<Product>>> + Send;

    fn create(
        &self,
        storefront_id: StorefrontId,
        product: &NewProduct,
    ) -> impl Future<Output = Res<Product>> + Send;

    /// `None` when the product is missing, deleted or not in this storefront.
    fn update(
        &self,
        storefront_id: StorefrontId,
        id: ProductId,
        product: &NewProduct,
    ) -> impl Future<Output = Res<Option<Product>>> + Send;

    /// Returns `false` when nothing was deleted.
    fn soft_delete(
        &self,
        storefront_id: StorefrontId,
        id: ProductId,
    ) -> impl Future<Output = Res<bool>> + Send;
}

pub trait CollectionStore: Send + Sync {
    /// Ordered by position, then id.
    fn list(&self, storefront_id: StorefrontId)
    -> impl Future<Output = Res<Vec<Collection>>> + Send;

    fn exists(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
    ) -> impl Future<Output = Res<bool>> + Send;

    fn create(
        &self,
        storefront_id: StorefrontId,
        input: &CollectionInput,
    ) -> impl Future<Output = Res<Collection>> + Send;

    fn update(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
        input: &CollectionInput,
    ) -> impl Future<Output = Res<Option<Collection>>> + Send;

    fn delete(
        &self,
        storefront_id: StorefrontId,
        id: CollectionId,
    ) -> impl Future<Output = Res<bool>> + Send;
}

/// A tracked click, as needed for the redirect and the owner alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    pub product_id: ProductId,
    pub product_title: String,
    pub affiliate_url: String,
    pub clicks: i64,
    pub storefront_id: StorefrontId,
    pub owner_id: UserId,
    /// When the click event was logged.
    pub clicked_at: DateTime<Utc>,
}

pub trait ClickStore: Send + Sync {
    /// Increment the counter and record the event atomically.
    ///
    /// `None` when the product does not exist or was deleted.
    fn record(
        &self,
        product_id: ProductId,
        visitor: Option<UserId>,
        referrer: Option<&str>,
    ) -> impl Future<Output = Res<Option<ClickTarget>>> + Send;

    fn totals(
        &self,
        storefront_id: StorefrontId,
    ) -> impl Future<Output = Res<Vec<ProductClicks>>> + Send;
}

pub trait SubscriberStore: Send + Sync {
    /// Returns `true` when the address was new for this storefront.
    fn add(
        &self,
        storefront_id: StorefrontId,
        email: &Email,
    ) -> impl Future<Output = Res<bool>> + Send;

    fn list(&self, storefront_id: StorefrontId)
    -> impl Future<Output = Res<Vec<Subscriber>>> + Send;
}

/// One weekly report recipient.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReportRecipient {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub storefront_id: StorefrontId,
    pub storefront_title: String,
}

/// Figures for one storefront over the last seven days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyStats {
    pub clicks: i64,
    pub new_subscribers: i64,
    /// Up to five `(title, clicks)` pairs, most clicked first.
    pub top_products: Vec<(String, i64)>,
}

pub trait ReportStore: Send + Sync {
    /// Users who opted into the weekly report and have a storefront.
    fn weekly_recipients(&self) -> impl Future<Output = Res<Vec<ReportRecipient>>> + Send;

    fn weekly_stats(
        &self,
        storefront_id: StorefrontId,
    ) -> impl Future<Output = Res<WeeklyStats>> + Send;
}
