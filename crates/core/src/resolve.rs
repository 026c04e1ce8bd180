//! Settings resolution.
//!
//! [`resolve`] turns an optional [`StorefrontSettings`] record into a
//! [`ResolvedPresentation`] in which every style field is concrete. Tiers are
//! applied in order, later tiers winning:
//!
//! 1. template defaults (or [`BASELINE`] when the template is absent/unknown)
//! 2. the theme: explicit `theme_id`, else the template's default theme
//! 3. dashboard preferences (typography, layout, branding)
//! 4. `template_overrides`
//!
//! Logo and banner URLs saved on the storefront record itself sit below the
//! branding preferences; see [`resolve_with_assets`].
//!
//! Each tier is merged one leaf at a time. An absent or empty leaf inherits.
//! This is the only place defaults are applied; renderers, the preview
//! endpoint and email templates all consume the output as-is.

use serde::Serialize;

use crate::settings::{CollabHighlight, Section, SocialLink, StorefrontSettings};
use crate::template::{BASELINE, Template, find_template_by_id};
use crate::theme::{Theme, find_theme_by_id};

const DEFAULT_HEADER_STYLE: &str = "classic";
const DEFAULT_FOOTER_STYLE: &str = "simple";
const DEFAULT_SIDEBAR_POSITION: &str = "none";
const DEFAULT_BASE_SIZE: u16 = 16;
const DEFAULT_SCALE_RATIO: f32 = 1.25;

const DEFAULT_CAPTURE_TITLE: &str = "Join the list";
const DEFAULT_CAPTURE_DESCRIPTION: &str = "Get new picks and drops straight to your inbox.";
const DEFAULT_CAPTURE_BUTTON: &str = "Subscribe";
const DEFAULT_CAPTURE_SUCCESS: &str = "Thanks for subscribing!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFonts {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayout {
    pub spacing: String,
    pub container_width: String,
    pub border_radius: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImageStyle {
    pub border: String,
    pub shadow: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAccentElements {
    pub dividers: String,
    pub icons: String,
    pub product_card: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBannerStyle {
    pub overlay: String,
    pub gradient: String,
}

/// Header, footer and sidebar variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedChrome {
    pub header_style: String,
    pub footer_style: String,
    pub sidebar_position: String,
    pub show_breadcrumbs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTypography {
    pub base_size: u16,
    pub scale_ratio: f32,
}

/// Brand assets. The URLs stay optional: a missing logo is rendered as the
/// storefront title, not as a placeholder image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBranding {
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub favicon_url: Option<String>,
    pub color_palette: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSubscriberCapture {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub success_message: String,
}

/// Fully-defaulted presentation of one storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPresentation {
    /// Catalog template in effect, `None` when the baseline was used.
    pub template_id: Option<String>,
    /// Theme whose style tokens were applied.
    pub theme_id: String,
    pub colors: ResolvedColors,
    pub fonts: ResolvedFonts,
    pub layout: ResolvedLayout,
    pub button_style: String,
    pub button_radius: String,
    pub image_style: ResolvedImageStyle,
    pub accent_elements: ResolvedAccentElements,
    pub banner_style: ResolvedBannerStyle,
    pub chrome: ResolvedChrome,
    pub typography: ResolvedTypography,
    pub branding: ResolvedBranding,
    /// Sorted by `order`, ties in saved order.
    pub sections: Vec<Section>,
    pub custom_css: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub collab_highlights: Vec<CollabHighlight>,
    pub subscriber_capture: ResolvedSubscriberCapture,
}

/// The denormalized storefront columns derived from a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedTheme {
    pub primary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub theme_id: String,
}

impl From<&ResolvedPresentation> for FlattenedTheme {
    fn from(p: &ResolvedPresentation) -> Self {
        Self {
            primary_color: p.colors.primary.clone(),
            accent_color: p.colors.accent.clone(),
            background_color: p.colors.background.clone(),
            text_color: p.colors.text.clone(),
            font_family: p.fonts.body.clone(),
            theme_id: p.theme_id.clone(),
        }
    }
}

/// Asset URLs kept on the storefront record, outside the settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorefrontAssets<'a> {
    pub logo_url: Option<&'a str>,
    pub banner_url: Option<&'a str>,
}

/// Resolve `settings` against the catalogs.
///
/// `None` is treated the same as a baseline settings record.
#[must_use]
pub fn resolve(settings: Option<&StorefrontSettings>) -> ResolvedPresentation {
    resolve_with_assets(settings, StorefrontAssets::default())
}

/// [`resolve`], with `assets` filling a logo or banner the branding
/// preferences leave unset.
#[must_use]
pub fn resolve_with_assets(
    settings: Option<&StorefrontSettings>,
    assets: StorefrontAssets<'_>,
) -> ResolvedPresentation {
    let baseline = StorefrontSettings::baseline();
    let settings = settings.unwrap_or(&baseline);

    let template = settings
        .template_id
        .as_deref()
        .and_then(find_template_by_id);
    let explicit_theme = settings.theme_id.as_deref().filter(|id| !id.is_empty());

    let mut presentation = from_template(template.unwrap_or(&BASELINE));

    // An unknown explicit id still counts as explicit and lands on the
    // default theme, so the result never depends on which id was stale.
    let theme = match explicit_theme {
        Some(id) => {
            let theme = find_theme_by_id(id);
            apply_theme_palette(&mut presentation, theme);
            theme
        }
        None => find_theme_by_id(template.unwrap_or(&BASELINE).default_theme),
    };
    apply_theme_styles(&mut presentation, theme);
    apply_preferences(&mut presentation, settings);
    apply_overrides(&mut presentation, settings);

    let content = &settings.content;
    presentation.button_radius = non_empty(content.branding.button_radius.as_deref())
        .unwrap_or(presentation.layout.border_radius.as_str())
        .to_string();
    presentation.template_id = template.map(|t| t.id.to_string());
    presentation.branding = ResolvedBranding {
        logo_url: non_empty(content.branding.logo_url.as_deref())
            .or_else(|| non_empty(assets.logo_url))
            .map(str::to_string),
        banner_url: non_empty(content.branding.banner_url.as_deref())
            .or_else(|| non_empty(assets.banner_url))
            .map(str::to_string),
        favicon_url: non_empty(content.branding.favicon_url.as_deref()).map(str::to_string),
        color_palette: content.branding.color_palette.clone(),
    };

    let mut sections = content.sections.clone();
    // `sort_by_key` is stable.
    sections.sort_by_key(|section| section.order);
    presentation.sections = sections;
    presentation.custom_css = non_empty(content.custom_css.as_deref()).map(str::to_string);
    presentation.social_links = content.social_links.clone();
    presentation.collab_highlights = content.collab_highlights.clone();

    let capture = &content.subscriber_capture;
    presentation.subscriber_capture = ResolvedSubscriberCapture {
        enabled: capture.enabled.unwrap_or(false),
        title: or_default(capture.title.as_deref(), DEFAULT_CAPTURE_TITLE),
        description: or_default(capture.description.as_deref(), DEFAULT_CAPTURE_DESCRIPTION),
        button_text: or_default(capture.button_text.as_deref(), DEFAULT_CAPTURE_BUTTON),
        success_message: or_default(capture.success_message.as_deref(), DEFAULT_CAPTURE_SUCCESS),
    };

    presentation
}

fn from_template(template: &Template) -> ResolvedPresentation {
    let c = template.colors;
    ResolvedPresentation {
        template_id: None,
        theme_id: String::new(),
        colors: ResolvedColors {
            primary: c.primary.to_string(),
            secondary: c.secondary.to_string(),
            accent: c.accent.to_string(),
            background: c.background.to_string(),
            text: c.text.to_string(),
        },
        fonts: ResolvedFonts {
            heading: template.fonts.heading.to_string(),
            body: template.fonts.body.to_string(),
        },
        layout: ResolvedLayout {
            spacing: template.layout.spacing.to_string(),
            container_width: template.layout.container_width.to_string(),
            border_radius: template.layout.border_radius.to_string(),
        },
        button_style: String::new(),
        button_radius: String::new(),
        image_style: ResolvedImageStyle {
            border: String::new(),
            shadow: String::new(),
        },
        accent_elements: ResolvedAccentElements {
            dividers: String::new(),
            icons: String::new(),
            product_card: String::new(),
        },
        banner_style: ResolvedBannerStyle {
            overlay: String::new(),
            gradient: String::new(),
        },
        chrome: ResolvedChrome {
            header_style: DEFAULT_HEADER_STYLE.to_string(),
            footer_style: DEFAULT_FOOTER_STYLE.to_string(),
            sidebar_position: DEFAULT_SIDEBAR_POSITION.to_string(),
            show_breadcrumbs: false,
        },
        typography: ResolvedTypography {
            base_size: DEFAULT_BASE_SIZE,
            scale_ratio: DEFAULT_SCALE_RATIO,
        },
        branding: ResolvedBranding {
            logo_url: None,
            banner_url: None,
            favicon_url: None,
            color_palette: Vec::new(),
        },
        sections: Vec::new(),
        custom_css: None,
        social_links: Vec::new(),
        collab_highlights: Vec::new(),
        subscriber_capture: ResolvedSubscriberCapture {
            enabled: false,
            title: String::new(),
            description: String::new(),
            button_text: String::new(),
            success_message: String::new(),
        },
    }
}

/// Colors and fonts of an explicitly chosen theme. Secondary has no theme
/// counterpart and stays with the template.
fn apply_theme_palette(p: &mut ResolvedPresentation, theme: &Theme) {
    p.colors.primary = theme.colors.primary.to_string();
    p.colors.background = theme.colors.background.to_string();
    p.colors.text = theme.colors.text.to_string();
    p.colors.accent = theme.colors.accent.to_string();
    p.fonts.heading = theme.fonts.heading.to_string();
    p.fonts.body = theme.fonts.body.to_string();
}

/// Style groups templates do not define.
fn apply_theme_styles(p: &mut ResolvedPresentation, theme: &Theme) {
    p.theme_id = theme.id.to_string();
    p.button_style = theme.button_style.to_string();
    p.image_style.border = theme.image_style.border.to_string();
    p.image_style.shadow = theme.image_style.shadow.to_string();
    p.accent_elements.dividers = theme.accent_elements.dividers.to_string();
    p.accent_elements.icons = theme.accent_elements.icons.to_string();
    p.accent_elements.product_card = theme.accent_elements.product_card.to_string();
    p.banner_style.overlay = theme.banner_style.overlay.to_string();
    p.banner_style.gradient = theme.banner_style.gradient.to_string();
}

fn apply_preferences(p: &mut ResolvedPresentation, settings: &StorefrontSettings) {
    let content = &settings.content;

    set(&mut p.fonts.heading, content.typography.heading_font.as_deref());
    set(&mut p.fonts.body, content.typography.body_font.as_deref());
    if let Some(size) = content.typography.base_size {
        p.typography.base_size = size;
    }
    if let Some(ratio) = content.typography.scale_ratio {
        p.typography.scale_ratio = ratio;
    }

    let layout = &content.layout;
    set(&mut p.layout.container_width, layout.container_width.as_deref());
    set(&mut p.layout.spacing, layout.spacing.as_deref());
    set(&mut p.chrome.header_style, layout.header_style.as_deref());
    set(&mut p.chrome.footer_style, layout.footer_style.as_deref());
    set(&mut p.chrome.sidebar_position, layout.sidebar_position.as_deref());
    if let Some(show) = layout.show_breadcrumbs {
        p.chrome.show_breadcrumbs = show;
    }

    set(&mut p.button_style, content.branding.button_style.as_deref());
}

fn apply_overrides(p: &mut ResolvedPresentation, settings: &StorefrontSettings) {
    let o = &settings.template_overrides;

    if let Some(colors) = &o.colors {
        set(&mut p.colors.primary, colors.primary.as_deref());
        set(&mut p.colors.secondary, colors.secondary.as_deref());
        set(&mut p.colors.accent, colors.accent.as_deref());
        set(&mut p.colors.background, colors.background.as_deref());
        set(&mut p.colors.text, colors.text.as_deref());
    }
    if let Some(fonts) = &o.fonts {
        set(&mut p.fonts.heading, fonts.heading.as_deref());
        set(&mut p.fonts.body, fonts.body.as_deref());
    }
    if let Some(layout) = &o.layout {
        set(&mut p.layout.spacing, layout.spacing.as_deref());
        set(&mut p.layout.container_width, layout.container_width.as_deref());
        set(&mut p.layout.border_radius, layout.border_radius.as_deref());
    }
    set(&mut p.button_style, o.button_style.as_deref());
    if let Some(image) = &o.image_style {
        set(&mut p.image_style.border, image.border.as_deref());
        set(&mut p.image_style.shadow, image.shadow.as_deref());
    }
    if let Some(accents) = &o.accent_elements {
        set(&mut p.accent_elements.dividers, accents.dividers.as_deref());
        set(&mut p.accent_elements.icons, accents.icons.as_deref());
        set(&mut p.accent_elements.product_card, accents.product_card.as_deref());
    }
    if let Some(banner) = &o.banner_style {
        set(&mut p.banner_style.overlay, banner.overlay.as_deref());
        set(&mut p.banner_style.gradient, banner.gradient.as_deref());
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn set(target: &mut String, value: Option<&str>) {
    if let Some(value) = non_empty(value) {
        value.clone_into(target);
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}
