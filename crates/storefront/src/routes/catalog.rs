//! Read-only theme and template catalogs for the dashboard pickers.

use axum::Json;

use briklyst_core::template::{self, Template};
use briklyst_core::theme::{self, Theme};

pub async fn themes() -> Json<&'static [Theme]> {
    Json(theme::themes())
}

pub async fn templates() -> Json<&'static [Template]> {
    Json(template::templates())
}
