//! HTTP route handlers for the Briklyst server.
//!
//! # Route Structure
//!
//! ```text
//! # Public
//! GET    /s/{username}                    - Rendered storefront page
//! GET    /go/{id}                         - Count a click, 303 to the affiliate URL
//! GET    /api/storefronts                 - Storefront view (?userId= | ?username= | ?current)
//! POST   /api/storefronts/{id}/subscribers - Join a mailing list
//! GET    /api/catalog/themes              - Theme catalog
//! GET    /api/catalog/templates           - Template catalog
//!
//! # Auth
//! POST   /api/auth/register               - Create account and storefront, log in
//! POST   /api/auth/login                  - Password login
//! POST   /api/auth/logout                 - End session
//!
//! # Dashboard (requires auth)
//! GET    /api/account                     - Current user
//! PATCH  /api/account/notifications       - Weekly report / click alert opt-ins
//! PUT    /api/storefronts                 - Edit identity and legacy style fields
//! GET    /api/storefront/settings         - Stored and resolved settings
//! PUT    /api/storefront/settings         - Merge a settings patch
//! PATCH  /api/storefront/settings         - Merge a settings patch
//! PATCH  /api/storefront/theme            - Select a theme
//! POST   /api/storefront/preview          - Resolve a draft without saving
//! GET    /api/products                    - Owner products
//! POST   /api/products                    - Create product
//! PUT    /api/products/{id}               - Update product
//! DELETE /api/products/{id}               - Soft-delete product
//! POST   /api/products/import             - Bulk create
//! GET    /api/collections                 - Owner collections
//! POST   /api/collections                 - Create collection
//! PUT    /api/collections/{id}            - Update collection
//! DELETE /api/collections/{id}            - Delete collection
//! GET    /api/subscribers                 - Owner mailing list
//! GET    /api/analytics/clicks            - Per-product click totals
//! ```

pub mod account;
pub mod auth;
pub mod catalog;
pub mod clicks;
pub mod collections;
pub mod page;
pub mod products;
pub mod settings;
pub mod storefronts;
pub mod subscribers;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the storefront lookup and signup routes router.
pub fn storefront_routes() -> Router<AppState> {
    let signups = Router::new()
        .route("/{id}/subscribers", post(storefronts::subscribe))
        .layer(api_rate_limiter());

    Router::new()
        .route("/", get(storefronts::show).put(storefronts::update))
        .merge(signups)
}

/// Create the settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(settings::show).put(settings::save).patch(settings::save),
        )
        .route("/theme", patch(settings::set_theme))
        .route("/preview", post(settings::preview))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/themes", get(catalog::themes))
        .route("/templates", get(catalog::templates))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/import", post(products::import))
        .route("/{id}", put(products::update).delete(products::delete))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index).post(collections::create))
        .route("/{id}", put(collections::update).delete(collections::delete))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public pages
        .route("/s/{username}", get(page::show))
        .route("/go/{id}", get(clicks::go))
        // Auth
        .nest("/api/auth", auth_routes())
        // Storefronts and settings
        .nest("/api/storefronts", storefront_routes())
        .nest("/api/storefront", settings_routes())
        .nest("/api/catalog", catalog_routes())
        // Account
        .route("/api/account", get(account::show))
        .route(
            "/api/account/notifications",
            patch(account::update_notifications),
        )
        // Owner data
        .nest("/api/products", product_routes())
        .nest("/api/collections", collection_routes())
        .route("/api/subscribers", get(subscribers::index))
        .route("/api/analytics/clicks", get(clicks::analytics))
}
