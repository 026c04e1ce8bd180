//! Briklyst Core - shared types and the storefront theming engine.
//!
//! This crate is used by:
//! - `storefront` - the HTTP server (public pages, dashboard API)
//! - `cli` - migrations, catalog listing and the weekly report job
//!
//! # Architecture
//!
//! Everything here is pure: no I/O, no database access, no HTTP. The
//! storefront crate feeds persisted records in and renders what comes out.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, color tokens and prices
//! - [`theme`] - Static theme catalog
//! - [`template`] - Static template catalog
//! - [`settings`] - Persisted per-storefront settings and write patches
//! - [`resolve`] - Layered settings resolution into a [`ResolvedPresentation`]
//! - [`style`] - Projection of a resolved presentation into CSS variables and
//!   email tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod resolve;
pub mod settings;
pub mod style;
pub mod template;
pub mod theme;
pub mod types;

pub use resolve::{
    FlattenedTheme, ResolvedPresentation, StorefrontAssets, resolve, resolve_with_assets,
};
pub use settings::{SettingsError, SettingsPatch, StorefrontSettings};
pub use template::{Template, find_template_by_id};
pub use theme::{Theme, find_theme_by_id};
pub use types::*;
