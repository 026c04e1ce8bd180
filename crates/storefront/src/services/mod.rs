//! Business logic services for the storefront.
//!
//! Services are generic over the store traits in [`crate::db`] and take
//! their stores by value. Route handlers build them from the per-request
//! `PgPool` repositories; tests build them from the in-memory store.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `settings` - The settings write path and live preview
//! - `presentation` - Public storefront view model
//! - `products` - Owner product CRUD and bulk import
//! - `collections` - Owner collection CRUD
//! - `clicks` - Click tracking, owner alerts and totals
//! - `subscribers` - Mailing-list signups
//! - `email` - Mail transports and message templates
//! - `report` - The weekly owner report job

pub mod auth;
pub mod clicks;
pub mod collections;
pub mod email;
pub mod presentation;
pub mod products;
pub mod report;
pub mod settings;
pub mod subscribers;
