//! Domain models for the storefront server.
//!
//! Row types derive `sqlx::FromRow` and are decoded with runtime queries;
//! validated core types (`Email`, `Price`) are converted on the way out of
//! the database so a corrupt row surfaces as an error instead of leaking.

pub mod click;
pub mod collection;
pub mod product;
pub mod session;
pub mod storefront;
pub mod subscriber;
pub mod user;

pub use click::{ClickEvent, ProductClicks};
pub use collection::{Collection, CollectionInput};
pub use product::{Product, ProductInput, PublicProduct};
pub use session::{CurrentUser, keys as session_keys};
pub use storefront::{Storefront, StorefrontDetails};
pub use subscriber::Subscriber;
pub use user::User;
