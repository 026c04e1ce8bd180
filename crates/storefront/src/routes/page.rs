//! The public storefront page, `GET /s/{username}`.
//!
//! The root element carries the `--bk-*` custom properties of the resolved
//! presentation; everything in the page styles itself from those.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use briklyst_core::settings::Section;
use briklyst_core::style::sanitize_custom_css;

use crate::db::{ProductRepository, StorefrontRepository};
use crate::error::{AppError, Result};
use crate::services::presentation::{Lookup, PresentationService, StorefrontView};
use crate::state::AppState;

/// A content section reduced to what the page renders.
///
/// Section content is free-form JSON; the page shows its `title`
/// (or `heading`), `body` (or `text`) and an http(s) `imageUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    pub id: String,
    pub kind: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Section> for SectionBlock {
    fn from(section: &Section) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| section.content.get(*key).and_then(serde_json::Value::as_str))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let image_url = text(&["imageUrl", "image"])
            .filter(|url| url.starts_with("https://") || url.starts_with("http://"));
        Self {
            id: section.id.clone(),
            kind: section.kind.clone(),
            title: text(&["title", "heading"]),
            body: text(&["body", "text"]),
            image_url,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "storefront/page.html")]
pub struct StorefrontPage {
    pub view: StorefrontView,
    /// Sections in display order.
    pub sections: Vec<SectionBlock>,
    /// Owner CSS, already made safe for a `<style>` element.
    pub custom_css: Option<String>,
}

impl From<StorefrontView> for StorefrontPage {
    fn from(view: StorefrontView) -> Self {
        let resolved = &view.presentation.resolved;
        let custom_css = resolved.custom_css.as_deref().map(sanitize_custom_css);
        let sections = resolved.sections.iter().map(SectionBlock::from).collect();
        Self {
            view,
            sections,
            custom_css,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "storefront/not_found.html")]
pub struct NotFoundPage {
    pub username: String,
}

#[tracing::instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(username): Path<String>) -> Result<Response> {
    let lookup = Lookup::Username(username.clone());
    let result = PresentationService::new(
        StorefrontRepository::new(state.pool()),
        ProductRepository::new(state.pool()),
    )
    .get_presentation(lookup)
    .await;

    match result {
        Ok(view) => Ok(StorefrontPage::from(view).into_response()),
        Err(AppError::NotFound(_)) => {
            Ok((StatusCode::NOT_FOUND, NotFoundPage { username }).into_response())
        }
        Err(e) => Err(e),
    }
}
