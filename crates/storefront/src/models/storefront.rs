//! Storefront records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use briklyst_core::settings::{ColorOverrides, FontOverrides, TemplateOverrides};
use briklyst_core::{SettingsPatch, StorefrontAssets, StorefrontId, UserId};

use crate::error::AppError;

/// A storefront row.
///
/// The color/font/theme columns are a cache of the last resolved settings.
/// They are only written by the settings write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Storefront {
    pub id: StorefrontId,
    #[serde(skip)]
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub primary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub theme_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Storefront {
    /// Logo and banner saved on the record, the lowest branding tier.
    #[must_use]
    pub fn assets(&self) -> StorefrontAssets<'_> {
        StorefrontAssets {
            logo_url: self.logo_url.as_deref(),
            banner_url: self.banner_url.as_deref(),
        }
    }
}

/// Body of `PUT /api/storefronts`.
///
/// Identity fields are written to the storefront row. Presentation fields
/// are turned into a [`SettingsPatch`] merged in the same transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub theme_id: Option<String>,
}

/// Identity fields of [`StorefrontDetails`] after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
}

impl IdentityUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl StorefrontDetails {
    /// Split into an identity update and a settings patch.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for malformed identity fields. The
    /// settings patch is validated by the settings write path.
    pub fn split(self) -> Result<(IdentityUpdate, SettingsPatch), AppError> {
        let invalid = |field: &str| AppError::Validation(format!("Invalid value for {field}"));

        let title = self.title.map(|t| t.trim().to_string());
        if title
            .as_ref()
            .is_some_and(|t| t.is_empty() || t.chars().count() > 120)
        {
            return Err(invalid("title"));
        }
        let description = self.description.map(|d| d.trim().to_string());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > 2000)
        {
            return Err(invalid("description"));
        }
        let domain = self.domain.map(|d| d.trim().to_ascii_lowercase());
        if domain.as_deref().is_some_and(|d| !d.is_empty() && !is_hostname(d)) {
            return Err(invalid("domain"));
        }
        for (field, value) in [("logoUrl", &self.logo_url), ("bannerUrl", &self.banner_url)] {
            if value.as_deref().is_some_and(|u| !u.is_empty() && !is_http_url(u)) {
                return Err(invalid(field));
            }
        }

        let identity = IdentityUpdate {
            title,
            description,
            domain,
            logo_url: self.logo_url,
            banner_url: self.banner_url,
        };

        let colors = ColorOverrides {
            primary: self.primary_color,
            accent: self.accent_color,
            background: self.background_color,
            text: self.text_color,
            secondary: None,
        };
        let fonts = FontOverrides {
            heading: None,
            body: self.font_family,
        };
        let overrides = TemplateOverrides {
            colors: (colors != ColorOverrides::default()).then_some(colors),
            fonts: (fonts != FontOverrides::default()).then_some(fonts),
            ..TemplateOverrides::default()
        };
        let patch = SettingsPatch {
            theme_id: self.theme_id,
            template_overrides: (overrides != TemplateOverrides::default()).then_some(overrides),
            ..SettingsPatch::default()
        };

        Ok((identity, patch))
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

fn is_hostname(value: &str) -> bool {
    value.len() <= 253
        && value.contains('.')
        && value.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_moves_colors_into_overrides() {
        let details = StorefrontDetails {
            title: Some(" Ana's Picks ".to_string()),
            accent_color: Some("#E04FD4".to_string()),
            ..StorefrontDetails::default()
        };
        let (identity, patch) = details.split().unwrap();

        assert_eq!(identity.title.as_deref(), Some("Ana's Picks"));
        let colors = patch.template_overrides.unwrap().colors.unwrap();
        assert_eq!(colors.accent.as_deref(), Some("#E04FD4"));
        assert_eq!(colors.primary, None);
    }

    #[test]
    fn test_split_without_presentation_fields_is_empty_patch() {
        let details = StorefrontDetails {
            description: Some("Things I use daily".to_string()),
            ..StorefrontDetails::default()
        };
        let (identity, patch) = details.split().unwrap();
        assert!(!identity.is_empty());
        assert!(patch.is_empty());
    }

    #[test]
    fn test_split_rejects_bad_domain() {
        let details = StorefrontDetails {
            domain: Some("not a domain".to_string()),
            ..StorefrontDetails::default()
        };
        assert!(details.split().is_err());
        assert!(is_hostname("shop.ana.dev"));
    }

    #[test]
    fn test_split_allows_clearing_with_empty_string() {
        let details = StorefrontDetails {
            domain: Some(String::new()),
            logo_url: Some(String::new()),
            ..StorefrontDetails::default()
        };
        let (identity, _) = details.split().unwrap();
        assert_eq!(identity.domain.as_deref(), Some(""));
        assert_eq!(identity.logo_url.as_deref(), Some(""));
    }
}
