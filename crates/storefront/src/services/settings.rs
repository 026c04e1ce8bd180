//! The settings write path and the live preview.
//!
//! Every change to template, theme, overrides or content goes through
//! [`SettingsService::apply`]: validate, then hand the patch to the store,
//! which merges it and rewrites the flattened storefront columns in one
//! transaction. The preview runs the same merge and resolution in memory.

use serde::Serialize;

use briklyst_core::style::{CssVariable, css_variables, style_attribute};
use briklyst_core::{
    FlattenedTheme, ResolvedPresentation, SettingsPatch, StorefrontSettings, UserId, resolve,
    resolve_with_assets,
};

use crate::db::StorefrontStore;
use crate::error::{AppError, Result};
use crate::models::{Storefront, StorefrontDetails};

/// Flattened storefront columns for `settings`.
#[must_use]
pub fn flatten(settings: &StorefrontSettings) -> FlattenedTheme {
    FlattenedTheme::from(&resolve(Some(settings)))
}

/// A resolved presentation with its CSS projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationStyle {
    pub resolved: ResolvedPresentation,
    pub css_variables: Vec<CssVariable>,
    pub style: String,
}

impl From<ResolvedPresentation> for PresentationStyle {
    fn from(resolved: ResolvedPresentation) -> Self {
        Self {
            css_variables: css_variables(&resolved),
            style: style_attribute(&resolved),
            resolved,
        }
    }
}

/// Stored settings alongside what they resolve to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub storefront: Storefront,
    pub settings: StorefrontSettings,
    #[serde(flatten)]
    pub presentation: PresentationStyle,
}

pub struct SettingsService<S> {
    storefronts: S,
}

impl<S: StorefrontStore> SettingsService<S> {
    #[must_use]
    pub const fn new(storefronts: S) -> Self {
        Self { storefronts }
    }

    /// Current settings of the owner's storefront, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn get(&self, user_id: UserId) -> Result<SettingsView> {
        let storefront = self.storefronts.ensure(user_id, flatten).await?;
        let settings = self
            .storefronts
            .settings(user_id)
            .await?
            .unwrap_or_default();
        Ok(view(storefront, settings))
    }

    /// Validate and persist a patch.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an invalid patch, in which case
    /// nothing is written.
    #[tracing::instrument(skip(self, patch), fields(user_id = %user_id))]
    pub async fn apply(&self, user_id: UserId, patch: SettingsPatch) -> Result<SettingsView> {
        patch.validate()?;
        let (storefront, settings) = self
            .storefronts
            .apply_settings(user_id, &patch, flatten)
            .await?;
        tracing::info!(theme_id = %storefront.theme_id, "Settings saved");
        Ok(view(storefront, settings))
    }

    /// Select a theme explicitly.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the id is missing or unknown.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn set_theme(&self, user_id: UserId, theme_id: Option<String>) -> Result<SettingsView> {
        let theme_id = theme_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Theme ID is required".to_string()))?;
        self.apply(user_id, SettingsPatch::theme(theme_id)).await
    }

    /// Update identity fields and any presentation fields of a storefront
    /// edit form in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for malformed fields, checked before
    /// anything is written, and a conflict when the domain is taken, in
    /// which case nothing is written either.
    #[tracing::instrument(skip(self, details), fields(user_id = %user_id))]
    pub async fn update_details(
        &self,
        user_id: UserId,
        details: StorefrontDetails,
    ) -> Result<SettingsView> {
        let (identity, patch) = details.split()?;
        patch.validate()?;

        let (storefront, settings) = self
            .storefronts
            .save_details(user_id, &identity, &patch, flatten)
            .await?;
        tracing::info!(theme_id = %storefront.theme_id, "Storefront details saved");
        Ok(view(storefront, settings))
    }

    /// Resolve stored settings with `draft` applied, without saving.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an invalid draft.
    pub async fn preview(&self, user_id: UserId, draft: SettingsPatch) -> Result<PresentationStyle> {
        draft.validate()?;
        let stored = self
            .storefronts
            .settings(user_id)
            .await?
            .unwrap_or_default();
        let next = stored.with_patch(draft);
        let storefront = self.storefronts.find_by_user(user_id).await?;
        let assets = storefront.as_ref().map(Storefront::assets).unwrap_or_default();
        Ok(resolve_with_assets(Some(&next), assets).into())
    }
}

fn view(storefront: Storefront, settings: StorefrontSettings) -> SettingsView {
    let presentation = resolve_with_assets(Some(&settings), storefront.assets()).into();
    SettingsView {
        storefront,
        settings,
        presentation,
    }
}
