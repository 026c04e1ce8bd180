//! Projection of a [`ResolvedPresentation`] into render contexts.
//!
//! The public page and the dashboard preview both read the same `--bk-*`
//! custom properties; components never look at the presentation directly.
//! Emails only get the [`EmailTheme`] subset.

use std::fmt::Write as _;

use serde::Serialize;

use crate::resolve::ResolvedPresentation;

/// Padding step for each spacing token.
fn spacing_step(token: &str) -> &'static str {
    match token {
        "compact" => "0.75rem",
        "spacious" => "2rem",
        _ => "1.25rem",
    }
}

/// Button corner radius. Pill and sharp shapes win over the radius.
fn button_radius(style: &str, radius: &str) -> String {
    match style {
        "pill" => "9999px".to_string(),
        "sharp" | "square" => "0".to_string(),
        _ => radius.to_string(),
    }
}

/// Button fill and border; outline and ghost buttons are transparent.
fn button_fill(style: &str) -> (&'static str, &'static str, &'static str) {
    match style {
        "outline" => (
            "transparent",
            "var(--bk-color-accent)",
            "2px solid var(--bk-color-accent)",
        ),
        "ghost" => ("transparent", "var(--bk-color-accent)", "0"),
        _ => (
            "var(--bk-color-accent)",
            "var(--bk-color-background)",
            "0",
        ),
    }
}

fn image_border(token: &str) -> &'static str {
    match token {
        "thin" => "1px solid var(--bk-color-secondary)",
        "thick" => "3px solid var(--bk-color-text)",
        _ => "none",
    }
}

fn image_radius(token: &str) -> &'static str {
    match token {
        "rounded" => "1rem",
        _ => "var(--bk-radius)",
    }
}

fn image_shadow(token: &str) -> &'static str {
    match token {
        "soft" => "0 4px 12px rgba(0, 0, 0, 0.08)",
        "glow" => "0 0 24px color-mix(in srgb, var(--bk-color-accent) 45%, transparent)",
        "hard" => "6px 6px 0 var(--bk-color-text)",
        _ => "none",
    }
}

/// Divider height and paint.
fn divider(token: &str) -> (&'static str, &'static str) {
    match token {
        "gradient" => (
            "2px",
            "linear-gradient(90deg, var(--bk-color-primary), var(--bk-color-accent))",
        ),
        "thick" => ("4px", "var(--bk-color-text)"),
        "dotted" => (
            "2px",
            "repeating-linear-gradient(90deg, var(--bk-color-accent) 0 4px, transparent 4px 8px)",
        ),
        "organic" => ("3px", "var(--bk-color-accent)"),
        "wave" => (
            "3px",
            "repeating-linear-gradient(90deg, var(--bk-color-primary) 0 12px, var(--bk-color-accent) 12px 24px)",
        ),
        "none" => ("0", "transparent"),
        _ => ("1px", "var(--bk-color-secondary)"),
    }
}

fn icon_fill(token: &str) -> &'static str {
    match token {
        "solid" => "currentColor",
        "duotone" => "color-mix(in srgb, currentColor 35%, transparent)",
        _ => "none",
    }
}

/// Product card border and shadow.
fn card(token: &str) -> (&'static str, &'static str) {
    match token {
        "elevated" => ("0", "0 8px 24px rgba(0, 0, 0, 0.12)"),
        "outlined" => ("2px solid var(--bk-color-primary)", "none"),
        "brutal" => ("3px solid var(--bk-color-text)", "6px 6px 0 var(--bk-color-text)"),
        _ => ("1px solid var(--bk-color-secondary)", "none"),
    }
}

fn banner_overlay(token: &str) -> &'static str {
    match token {
        "dark" => "rgba(0, 0, 0, 0.45)",
        "light" => "rgba(255, 255, 255, 0.35)",
        "warm" => "rgba(194, 112, 61, 0.3)",
        _ => "transparent",
    }
}

fn banner_gradient(token: &str) -> &'static str {
    match token {
        "fade-bottom" => "linear-gradient(to bottom, transparent 40%, var(--bk-color-background))",
        "diagonal" => "linear-gradient(135deg, var(--bk-color-primary), transparent 60%)",
        "horizontal" => "linear-gradient(90deg, var(--bk-color-primary), transparent)",
        _ => "none",
    }
}

/// One CSS custom property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssVariable {
    pub name: &'static str,
    pub value: String,
}

/// The custom properties for `p`, in a fixed order.
///
/// Style tokens (button, image, accent and banner styles) map to concrete
/// CSS; an unrecognized token gets the plainest rendering.
#[must_use]
pub fn css_variables(p: &ResolvedPresentation) -> Vec<CssVariable> {
    let var = |name, value: String| CssVariable { name, value };
    let fixed = |name, value: &'static str| CssVariable {
        name,
        value: value.to_string(),
    };
    let (button_background, button_color, button_border) = button_fill(&p.button_style);
    let (divider_height, divider_paint) = divider(&p.accent_elements.dividers);
    let (card_border, card_shadow) = card(&p.accent_elements.product_card);
    vec![
        var("--bk-color-primary", p.colors.primary.clone()),
        var("--bk-color-secondary", p.colors.secondary.clone()),
        var("--bk-color-accent", p.colors.accent.clone()),
        var("--bk-color-background", p.colors.background.clone()),
        var("--bk-color-text", p.colors.text.clone()),
        var("--bk-font-heading", font_stack(&p.fonts.heading)),
        var("--bk-font-body", font_stack(&p.fonts.body)),
        var("--bk-container-width", p.layout.container_width.clone()),
        var("--bk-spacing", spacing_step(&p.layout.spacing).to_string()),
        var("--bk-radius", p.layout.border_radius.clone()),
        var("--bk-button-radius", button_radius(&p.button_style, &p.button_radius)),
        fixed("--bk-button-background", button_background),
        fixed("--bk-button-color", button_color),
        fixed("--bk-button-border", button_border),
        fixed("--bk-image-border", image_border(&p.image_style.border)),
        fixed("--bk-image-radius", image_radius(&p.image_style.border)),
        fixed("--bk-image-shadow", image_shadow(&p.image_style.shadow)),
        fixed("--bk-divider-height", divider_height),
        fixed("--bk-divider", divider_paint),
        fixed("--bk-icon-fill", icon_fill(&p.accent_elements.icons)),
        fixed("--bk-card-border", card_border),
        fixed("--bk-card-shadow", card_shadow),
        fixed("--bk-banner-overlay", banner_overlay(&p.banner_style.overlay)),
        fixed("--bk-banner-gradient", banner_gradient(&p.banner_style.gradient)),
        var("--bk-font-size", format!("{}px", p.typography.base_size)),
        var("--bk-scale-ratio", p.typography.scale_ratio.to_string()),
    ]
}

/// Inline `style` attribute value declaring every variable.
#[must_use]
pub fn style_attribute(p: &ResolvedPresentation) -> String {
    css_variables(p)
        .into_iter()
        .fold(String::new(), |mut out, CssVariable { name, value }| {
            let _ = write!(out, "{name}: {value}; ");
            out
        })
        .trim_end()
        .to_string()
}

fn font_stack(family: &str) -> String {
    if matches!(family, "sans-serif" | "serif" | "monospace") {
        family.to_string()
    } else {
        format!("\"{family}\", sans-serif")
    }
}

/// Make custom CSS safe to place inside a `<style>` element.
///
/// The text is otherwise emitted verbatim; only closing `</style` sequences
/// are broken up so the block cannot be terminated early.
#[must_use]
pub fn sanitize_custom_css(css: &str) -> String {
    const NEEDLE: &str = "</style";
    let lower = css.to_ascii_lowercase();
    let mut out = String::with_capacity(css.len());
    let mut rest = 0;
    for (start, _) in lower.match_indices(NEEDLE) {
        out.push_str(css.get(rest..start).unwrap_or_default());
        out.push_str("<\\/");
        rest = start + 2;
    }
    out.push_str(css.get(rest..).unwrap_or_default());
    out
}

/// Style tokens available to email templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailTheme {
    pub primary_color: String,
    pub storefront_title: String,
}

impl EmailTheme {
    #[must_use]
    pub fn new(p: &ResolvedPresentation, storefront_title: impl Into<String>) -> Self {
        Self {
            primary_color: p.colors.primary.clone(),
            storefront_title: storefront_title.into(),
        }
    }
}
