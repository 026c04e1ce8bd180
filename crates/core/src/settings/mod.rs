//! Per-storefront settings.
//!
//! [`StorefrontSettings`] is the persisted customization record for one
//! storefront. Every override is optional: a missing value means "inherit
//! from the template or theme", never "blank". Turning that record into
//! concrete values is the job of [`crate::resolve`].
//!
//! Writes arrive as a [`SettingsPatch`]. Applying a patch merges at the top
//! level (a field present in the patch replaces the stored field, absent
//! fields are kept) and per leaf inside `templateOverrides`. Switching to a
//! different template drops an explicit theme pick unless the same patch
//! names one. The database upsert in the storefront crate performs the same
//! merge in SQL, so preview and persistence never diverge.

mod patch;
mod validate;

pub use patch::{ContentPatch, SettingsPatch};
pub use validate::SettingsError;

use serde::{Deserialize, Serialize};

/// Leaf-optional palette override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FontOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageStyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccentElementOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_card: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BannerStyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
}

/// Storefront-specific overrides, taking precedence over template and theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplateOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<FontOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_style: Option<ImageStyleOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_elements: Option<AccentElementOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_style: Option<BannerStyleOverrides>,
}

/// Leaf-wise merge: a leaf present in `other` replaces the stored leaf.
macro_rules! merge_leaves {
    ($($group:ty { $($leaf:ident),+ $(,)? }),+ $(,)?) => {$(
        impl $group {
            pub fn merge(&mut self, other: Self) {
                $(
                    if other.$leaf.is_some() {
                        self.$leaf = other.$leaf;
                    }
                )+
            }
        }
    )+};
}

merge_leaves! {
    ColorOverrides { primary, secondary, accent, background, text },
    FontOverrides { heading, body },
    LayoutOverrides { spacing, container_width, border_radius },
    ImageStyleOverrides { border, shadow },
    AccentElementOverrides { dividers, icons, product_card },
    BannerStyleOverrides { overlay, gradient },
}

fn merge_group<T>(stored: &mut Option<T>, incoming: Option<T>, merge: impl FnOnce(&mut T, T)) {
    match (stored.as_mut(), incoming) {
        (Some(current), Some(incoming)) => merge(current, incoming),
        (None, Some(incoming)) => *stored = Some(incoming),
        (_, None) => {}
    }
}

impl TemplateOverrides {
    /// Merge `other` into `self` leaf by leaf.
    ///
    /// Only leaves present in `other` change; siblings inside the same group
    /// and absent groups are kept, so an empty group is a no-op. Matches
    /// `jsonb_merge_groups(template_overrides, $patch)` in SQL.
    pub fn merge(&mut self, other: Self) {
        merge_group(&mut self.colors, other.colors, ColorOverrides::merge);
        merge_group(&mut self.fonts, other.fonts, FontOverrides::merge);
        merge_group(&mut self.layout, other.layout, LayoutOverrides::merge);
        if other.button_style.is_some() {
            self.button_style = other.button_style;
        }
        merge_group(&mut self.image_style, other.image_style, ImageStyleOverrides::merge);
        merge_group(
            &mut self.accent_elements,
            other.accent_elements,
            AccentElementOverrides::merge,
        );
        merge_group(&mut self.banner_style, other.banner_style, BannerStyleOverrides::merge);
    }
}

/// Brand assets and button tweaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_radius: Option<String>,
    /// Saved swatches for the dashboard color picker.
    pub color_palette: Vec<String>,
}

/// Page chrome preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_breadcrumbs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
    /// Base font size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_size: Option<u16>,
    /// Modular type scale between heading levels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_ratio: Option<f32>,
}

/// A content block on the storefront page.
///
/// `order` values need not be contiguous. Blocks with equal `order` keep
/// the order in which they were saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// A brand collaboration card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabHighlight {
    pub id: String,
    pub brand: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

/// Mailing-list signup block configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriberCapture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

/// Page content and dashboard preferences, stored as one JSONB document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsContent {
    pub branding: Branding,
    pub layout: LayoutPreferences,
    pub typography: TypographyPreferences,
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub collab_highlights: Vec<CollabHighlight>,
    pub subscriber_capture: SubscriberCapture,
}

/// The persisted settings record of one storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontSettings {
    #[serde(default)]
    pub template_id: Option<String>,
    /// Theme picked explicitly by the owner, if any.
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub template_overrides: TemplateOverrides,
    #[serde(flatten)]
    pub content: SettingsContent,
}

impl StorefrontSettings {
    /// Settings for a brand-new storefront: nothing overridden.
    #[must_use]
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Apply a write patch using the same merge rules as the database upsert.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(template_id) = patch.template_id {
            if patch.theme_id.is_none() && self.template_id.as_ref() != Some(&template_id) {
                self.theme_id = None;
            }
            self.template_id = Some(template_id);
        }
        if patch.theme_id.is_some() {
            self.theme_id = patch.theme_id;
        }
        if let Some(overrides) = patch.template_overrides {
            self.template_overrides.merge(overrides);
        }
        self.content.apply(patch.content);
    }

    /// Return a copy with `patch` applied, leaving `self` untouched.
    #[must_use]
    pub fn with_patch(&self, patch: SettingsPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

impl SettingsContent {
    /// Replace every field the patch carries.
    pub fn apply(&mut self, patch: ContentPatch) {
        if let Some(branding) = patch.branding {
            self.branding = branding;
        }
        if let Some(layout) = patch.layout {
            self.layout = layout;
        }
        if let Some(typography) = patch.typography {
            self.typography = typography;
        }
        if let Some(sections) = patch.sections {
            self.sections = sections;
        }
        if patch.custom_css.is_some() {
            self.custom_css = patch.custom_css;
        }
        if let Some(links) = patch.social_links {
            self.social_links = links;
        }
        if let Some(highlights) = patch.collab_highlights {
            self.collab_highlights = highlights;
        }
        if let Some(capture) = patch.subscriber_capture {
            self.subscriber_capture = capture;
        }
    }
}
