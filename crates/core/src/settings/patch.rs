//! Settings write patches.

use serde::{Deserialize, Serialize};

use super::{
    Branding, CollabHighlight, LayoutPreferences, Section, SocialLink, SubscriberCapture,
    TemplateOverrides, TypographyPreferences,
};

/// Content fields of a settings write. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyPreferences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<SocialLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collab_highlights: Option<Vec<CollabHighlight>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_capture: Option<SubscriberCapture>,
}

/// A partial settings update, as sent by the dashboard editor.
///
/// Serializing a patch yields only the keys it carries, which is exactly
/// the right-hand side of the JSONB merge in the settings upsert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_overrides: Option<TemplateOverrides>,
    #[serde(flatten)]
    pub content: ContentPatch,
}

impl SettingsPatch {
    /// Patch that only selects a theme.
    #[must_use]
    pub fn theme(theme_id: impl Into<String>) -> Self {
        Self {
            theme_id: Some(theme_id.into()),
            ..Self::default()
        }
    }

    /// Patch that only changes override groups.
    #[must_use]
    pub fn overrides(overrides: TemplateOverrides) -> Self {
        Self {
            template_overrides: Some(overrides),
            ..Self::default()
        }
    }

    /// Whether the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// JSON object holding only the override groups this patch carries.
    ///
    /// # Errors
    ///
    /// Returns a serialization error; cannot happen for well-formed types.
    pub fn overrides_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match &self.template_overrides {
            Some(overrides) => serde_json::to_value(overrides),
            None => Ok(serde_json::Value::Object(serde_json::Map::new())),
        }
    }

    /// JSON object holding only the content fields this patch carries.
    ///
    /// # Errors
    ///
    /// Returns a serialization error; cannot happen for well-formed types.
    pub fn content_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.content)
    }
}
