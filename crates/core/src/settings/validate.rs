//! Write-boundary validation for settings patches.
//!
//! Resolution trusts stored settings, so everything is checked here before
//! it is persisted. Error messages name the offending field by its JSON path
//! and never echo the submitted value.

use std::collections::HashSet;

use url::Url;

use super::{
    Branding, CollabHighlight, LayoutPreferences, Section, SettingsPatch, SocialLink,
    SubscriberCapture, TemplateOverrides, TypographyPreferences,
};
use crate::template::find_template_by_id;
use crate::theme::is_known_theme;
use crate::types::ColorToken;

/// Spacing scale understood by the renderer.
pub const SPACING_SCALE: &[&str] = &["compact", "comfortable", "spacious"];

const MAX_CUSTOM_CSS: usize = 20_000;
const MAX_SECTIONS: usize = 50;
const MAX_SOCIAL_LINKS: usize = 20;
const MAX_HIGHLIGHTS: usize = 24;
const MAX_PALETTE: usize = 12;
const MAX_URL: usize = 2048;
const MAX_SHORT_TEXT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid template ID")]
    UnknownTemplate,
    #[error("Invalid theme ID")]
    UnknownTheme,
    #[error("Invalid value for {field}")]
    InvalidField { field: &'static str },
    #[error("Too many entries in {field} (max {max})")]
    TooMany { field: &'static str, max: usize },
    #[error("Duplicate id in {field}")]
    Duplicate { field: &'static str },
}

type Result<T = ()> = std::result::Result<T, SettingsError>;

impl SettingsPatch {
    /// Check every field the patch carries.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result {
        if let Some(template_id) = &self.template_id
            && find_template_by_id(template_id).is_none()
        {
            return Err(SettingsError::UnknownTemplate);
        }
        if let Some(theme_id) = &self.theme_id
            && !is_known_theme(theme_id)
        {
            return Err(SettingsError::UnknownTheme);
        }
        if let Some(overrides) = &self.template_overrides {
            validate_overrides(overrides)?;
        }

        let content = &self.content;
        if let Some(branding) = &content.branding {
            validate_branding(branding)?;
        }
        if let Some(layout) = &content.layout {
            validate_layout(layout)?;
        }
        if let Some(typography) = &content.typography {
            validate_typography(typography)?;
        }
        if let Some(sections) = &content.sections {
            validate_sections(sections)?;
        }
        if let Some(css) = &content.custom_css
            && css.len() > MAX_CUSTOM_CSS
        {
            return Err(SettingsError::InvalidField {
                field: "customCss",
            });
        }
        if let Some(links) = &content.social_links {
            validate_social_links(links)?;
        }
        if let Some(highlights) = &content.collab_highlights {
            validate_highlights(highlights)?;
        }
        if let Some(capture) = &content.subscriber_capture {
            validate_capture(capture)?;
        }
        Ok(())
    }
}

fn validate_overrides(o: &TemplateOverrides) -> Result {
    if let Some(colors) = &o.colors {
        color("templateOverrides.colors.primary", colors.primary.as_deref())?;
        color("templateOverrides.colors.secondary", colors.secondary.as_deref())?;
        color("templateOverrides.colors.accent", colors.accent.as_deref())?;
        color("templateOverrides.colors.background", colors.background.as_deref())?;
        color("templateOverrides.colors.text", colors.text.as_deref())?;
    }
    if let Some(fonts) = &o.fonts {
        font("templateOverrides.fonts.heading", fonts.heading.as_deref())?;
        font("templateOverrides.fonts.body", fonts.body.as_deref())?;
    }
    if let Some(layout) = &o.layout {
        spacing("templateOverrides.layout.spacing", layout.spacing.as_deref())?;
        length(
            "templateOverrides.layout.containerWidth",
            layout.container_width.as_deref(),
        )?;
        length(
            "templateOverrides.layout.borderRadius",
            layout.border_radius.as_deref(),
        )?;
    }
    token("templateOverrides.buttonStyle", o.button_style.as_deref())?;
    if let Some(image) = &o.image_style {
        token("templateOverrides.imageStyle.border", image.border.as_deref())?;
        token("templateOverrides.imageStyle.shadow", image.shadow.as_deref())?;
    }
    if let Some(accents) = &o.accent_elements {
        token("templateOverrides.accentElements.dividers", accents.dividers.as_deref())?;
        token("templateOverrides.accentElements.icons", accents.icons.as_deref())?;
        token(
            "templateOverrides.accentElements.productCard",
            accents.product_card.as_deref(),
        )?;
    }
    if let Some(banner) = &o.banner_style {
        token("templateOverrides.bannerStyle.overlay", banner.overlay.as_deref())?;
        token("templateOverrides.bannerStyle.gradient", banner.gradient.as_deref())?;
    }
    Ok(())
}

fn validate_branding(b: &Branding) -> Result {
    url("branding.logoUrl", b.logo_url.as_deref())?;
    url("branding.bannerUrl", b.banner_url.as_deref())?;
    url("branding.faviconUrl", b.favicon_url.as_deref())?;
    token("branding.buttonStyle", b.button_style.as_deref())?;
    length("branding.buttonRadius", b.button_radius.as_deref())?;
    if b.color_palette.len() > MAX_PALETTE {
        return Err(SettingsError::TooMany {
            field: "branding.colorPalette",
            max: MAX_PALETTE,
        });
    }
    for swatch in &b.color_palette {
        color("branding.colorPalette", Some(swatch))?;
    }
    Ok(())
}

fn validate_layout(l: &LayoutPreferences) -> Result {
    token("layout.headerStyle", l.header_style.as_deref())?;
    token("layout.footerStyle", l.footer_style.as_deref())?;
    if let Some(position) = l.sidebar_position.as_deref()
        && !matches!(position, "none" | "left" | "right")
    {
        return Err(SettingsError::InvalidField {
            field: "layout.sidebarPosition",
        });
    }
    length("layout.containerWidth", l.container_width.as_deref())?;
    spacing("layout.spacing", l.spacing.as_deref())
}

fn validate_typography(t: &TypographyPreferences) -> Result {
    font("typography.headingFont", t.heading_font.as_deref())?;
    font("typography.bodyFont", t.body_font.as_deref())?;
    if let Some(size) = t.base_size
        && !(10..=32).contains(&size)
    {
        return Err(SettingsError::InvalidField {
            field: "typography.baseSize",
        });
    }
    if let Some(ratio) = t.scale_ratio
        && !(ratio.is_finite() && (1.0..=2.0).contains(&ratio))
    {
        return Err(SettingsError::InvalidField {
            field: "typography.scaleRatio",
        });
    }
    Ok(())
}

fn validate_sections(sections: &[Section]) -> Result {
    if sections.len() > MAX_SECTIONS {
        return Err(SettingsError::TooMany {
            field: "sections",
            max: MAX_SECTIONS,
        });
    }
    let mut seen = HashSet::new();
    for section in sections {
        if section.id.trim().is_empty() || section.id.len() > 64 {
            return Err(SettingsError::InvalidField {
                field: "sections.id",
            });
        }
        if !seen.insert(section.id.as_str()) {
            return Err(SettingsError::Duplicate { field: "sections" });
        }
        token("sections.type", Some(&section.kind))?;
    }
    Ok(())
}

fn validate_social_links(links: &[SocialLink]) -> Result {
    if links.len() > MAX_SOCIAL_LINKS {
        return Err(SettingsError::TooMany {
            field: "socialLinks",
            max: MAX_SOCIAL_LINKS,
        });
    }
    for link in links {
        token("socialLinks.platform", Some(&link.platform))?;
        url("socialLinks.url", Some(&link.url))?;
    }
    Ok(())
}

fn validate_highlights(highlights: &[CollabHighlight]) -> Result {
    if highlights.len() > MAX_HIGHLIGHTS {
        return Err(SettingsError::TooMany {
            field: "collabHighlights",
            max: MAX_HIGHLIGHTS,
        });
    }
    let mut seen = HashSet::new();
    for highlight in highlights {
        if highlight.id.trim().is_empty() {
            return Err(SettingsError::InvalidField {
                field: "collabHighlights.id",
            });
        }
        if !seen.insert(highlight.id.as_str()) {
            return Err(SettingsError::Duplicate {
                field: "collabHighlights",
            });
        }
        text("collabHighlights.brand", Some(&highlight.brand))?;
        text("collabHighlights.title", Some(&highlight.title))?;
        url("collabHighlights.imageUrl", highlight.image_url.as_deref())?;
        url("collabHighlights.linkUrl", highlight.link_url.as_deref())?;
    }
    Ok(())
}

fn validate_capture(c: &SubscriberCapture) -> Result {
    text("subscriberCapture.title", c.title.as_deref())?;
    text("subscriberCapture.description", c.description.as_deref())?;
    text("subscriberCapture.buttonText", c.button_text.as_deref())?;
    text("subscriberCapture.successMessage", c.success_message.as_deref())
}

fn invalid(field: &'static str) -> SettingsError {
    SettingsError::InvalidField { field }
}

fn color(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if !ColorToken::is_valid(v) => Err(invalid(field)),
        _ => Ok(()),
    }
}

/// Font family names: letters, digits, spaces, hyphens and apostrophes.
fn font(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if !is_font_name(v) => Err(invalid(field)),
        _ => Ok(()),
    }
}

/// Style tokens: short lowercase kebab-case words.
fn token(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if !is_style_token(v) => Err(invalid(field)),
        _ => Ok(()),
    }
}

fn spacing(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if !SPACING_SCALE.contains(&v) => Err(invalid(field)),
        _ => Ok(()),
    }
}

fn length(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if !is_css_length(v) => Err(invalid(field)),
        _ => Ok(()),
    }
}

fn url(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if !is_http_url(v) => Err(invalid(field)),
        _ => Ok(()),
    }
}

fn text(field: &'static str, value: Option<&str>) -> Result {
    match value {
        Some(v) if v.trim().is_empty() || v.chars().count() > MAX_SHORT_TEXT => {
            Err(invalid(field))
        }
        _ => Ok(()),
    }
}

pub(crate) fn is_font_name(value: &str) -> bool {
    !value.trim().is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '\''))
}

pub(crate) fn is_style_token(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 32
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Non-negative CSS length in `px`, `rem`, `em`, `%` or `vw`.
pub(crate) fn is_css_length(value: &str) -> bool {
    let Some(split) = value.find(|c: char| !(c.is_ascii_digit() || c == '.')) else {
        return false;
    };
    let (number, unit) = value.split_at(split);
    !number.is_empty()
        && number.len() <= 8
        && number.parse::<f64>().is_ok()
        && matches!(unit, "px" | "rem" | "em" | "%" | "vw")
}

pub(crate) fn is_http_url(value: &str) -> bool {
    value.len() <= MAX_URL
        && Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn patch(value: serde_json::Value) -> SettingsPatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_patch_passes() {
        let p = patch(json!({
            "templateId": "sleek-noir",
            "themeId": "midnight-luxe",
            "templateOverrides": {
                "colors": {"accent": "#E04FD4"},
                "fonts": {"heading": "Playfair Display"},
                "layout": {"spacing": "compact", "containerWidth": "72rem"},
                "buttonStyle": "pill"
            },
            "branding": {"logoUrl": "https://cdn.example.com/logo.png", "colorPalette": ["#fff"]},
            "typography": {"baseSize": 18, "scaleRatio": 1.333},
            "sections": [{"id": "a", "type": "hero", "order": 1}],
            "socialLinks": [{"platform": "instagram", "url": "https://instagram.com/me"}]
        }));
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_catalog_ids() {
        assert_eq!(
            patch(json!({"templateId": "nope"})).validate(),
            Err(SettingsError::UnknownTemplate)
        );
        assert_eq!(
            SettingsPatch::theme("does-not-exist").validate(),
            Err(SettingsError::UnknownTheme)
        );
        assert_eq!(
            SettingsError::UnknownTheme.to_string(),
            "Invalid theme ID"
        );
    }

    #[test]
    fn test_bad_color_names_field_without_echoing_value() {
        let err = patch(json!({
            "templateOverrides": {"colors": {"accent": "<script>"}}
        }))
        .validate()
        .unwrap_err();

        assert_eq!(
            err,
            SettingsError::InvalidField {
                field: "templateOverrides.colors.accent"
            }
        );
        assert!(!err.to_string().contains("script"));
    }

    #[test]
    fn test_rejects_css_injection_in_tokens() {
        let p = patch(json!({"templateOverrides": {"fonts": {"body": "Inter; color: red"}}}));
        assert!(p.validate().is_err());

        let p = patch(json!({"templateOverrides": {"layout": {"borderRadius": "4px;}"}}}));
        assert!(p.validate().is_err());

        let p = patch(json!({"templateOverrides": {"buttonStyle": "Pill"}}));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let p = patch(json!({"branding": {"logoUrl": "javascript:alert(1)"}}));
        assert_eq!(
            p.validate(),
            Err(SettingsError::InvalidField {
                field: "branding.logoUrl"
            })
        );
    }

    #[test]
    fn test_typography_ranges() {
        assert!(patch(json!({"typography": {"baseSize": 9}})).validate().is_err());
        assert!(patch(json!({"typography": {"scaleRatio": 2.5}})).validate().is_err());
        assert!(patch(json!({"typography": {"baseSize": 32}})).validate().is_ok());
    }

    #[test]
    fn test_duplicate_section_ids() {
        let p = patch(json!({"sections": [
            {"id": "a", "type": "text", "order": 1},
            {"id": "a", "type": "text", "order": 2}
        ]}));
        assert_eq!(
            p.validate(),
            Err(SettingsError::Duplicate { field: "sections" })
        );
    }

    #[test]
    fn test_css_length() {
        assert!(is_css_length("1200px"));
        assert!(is_css_length("100%"));
        assert!(is_css_length("1.5rem"));
        assert!(!is_css_length("px"));
        assert!(!is_css_length("12"));
        assert!(!is_css_length("-4px"));
        assert!(!is_css_length("calc(100% - 2px)"));
    }
}
