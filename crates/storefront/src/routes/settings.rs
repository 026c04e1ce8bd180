//! Dashboard settings API: read, save, theme selection and live preview.

use axum::{Json, extract::State};
use serde::Deserialize;

use briklyst_core::SettingsPatch;

use crate::db::StorefrontRepository;
use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::services::settings::{PresentationStyle, SettingsService, SettingsView};
use crate::state::AppState;

/// Body of `PATCH /api/storefront/theme`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRequest {
    pub theme_id: Option<String>,
}

pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SettingsView>> {
    let view = SettingsService::new(StorefrontRepository::new(state.pool()))
        .get(user.id)
        .await?;
    Ok(Json(view))
}

/// Merge a patch into the stored settings. Serves both `PUT` and `PATCH`.
#[tracing::instrument(skip(state, user, patch), fields(user_id = %user.id))]
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(patch): ApiJson<SettingsPatch>,
) -> Result<Json<SettingsView>> {
    let view = SettingsService::new(StorefrontRepository::new(state.pool()))
        .apply(user.id, patch)
        .await?;
    Ok(Json(view))
}

#[tracing::instrument(skip(state, user, request), fields(user_id = %user.id))]
pub async fn set_theme(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<ThemeRequest>,
) -> Result<Json<SettingsView>> {
    let view = SettingsService::new(StorefrontRepository::new(state.pool()))
        .set_theme(user.id, request.theme_id)
        .await?;
    Ok(Json(view))
}

/// Resolve a draft against the stored settings without saving it.
pub async fn preview(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(draft): ApiJson<SettingsPatch>,
) -> Result<Json<PresentationStyle>> {
    let preview = SettingsService::new(StorefrontRepository::new(state.pool()))
        .preview(user.id, draft)
        .await?;
    Ok(Json(preview))
}
