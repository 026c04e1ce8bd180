//! Theme catalog.
//!
//! A theme is a complete visual preset: palette, font pairing and the style
//! tokens for buttons, images, accent elements and banners. Themes are
//! compiled into the binary and never change at runtime.
//!
//! Lookup never fails: an unknown id falls back to [`DEFAULT_THEME_ID`], so the
//! presentation layer always receives a full theme.

use serde::Serialize;

/// The theme used when no valid theme id is available.
pub const DEFAULT_THEME_ID: &str = "minimal-light";

/// Palette carried by a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

/// Heading and body font pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPair {
    pub heading: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStyle {
    pub border: &'static str,
    pub shadow: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccentElements {
    pub dividers: &'static str,
    pub icons: &'static str,
    pub product_card: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerStyle {
    pub overlay: &'static str,
    pub gradient: &'static str,
}

/// A named visual preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Short mood tag shown in the theme picker.
    pub vibe: &'static str,
    pub colors: ThemeColors,
    pub fonts: FontPair,
    pub button_style: &'static str,
    pub image_style: ImageStyle,
    pub accent_elements: AccentElements,
    pub banner_style: BannerStyle,
}

const MINIMAL_LIGHT: Theme = Theme {
    id: DEFAULT_THEME_ID,
    name: "Minimal Light",
    description: "Clean white canvas that lets product photography lead.",
    vibe: "clean",
    colors: ThemeColors {
        primary: "#111827",
        background: "#FFFFFF",
        text: "#111827",
        accent: "#2563EB",
    },
    fonts: FontPair {
        heading: "Inter",
        body: "Inter",
    },
    button_style: "rounded",
    image_style: ImageStyle {
        border: "none",
        shadow: "soft",
    },
    accent_elements: AccentElements {
        dividers: "hairline",
        icons: "outline",
        product_card: "flat",
    },
    banner_style: BannerStyle {
        overlay: "none",
        gradient: "none",
    },
};

static THEMES: &[Theme] = &[
    MINIMAL_LIGHT,
    Theme {
        id: "midnight-luxe",
        name: "Midnight Luxe",
        description: "Deep charcoal with neon highlights for after-dark brands.",
        vibe: "moody",
        colors: ThemeColors {
            primary: "#111112",
            background: "#0B0B0F",
            text: "#F4F4F5",
            accent: "#E04FD4",
        },
        fonts: FontPair {
            heading: "Playfair Display",
            body: "Inter",
        },
        button_style: "pill",
        image_style: ImageStyle {
            border: "thin",
            shadow: "glow",
        },
        accent_elements: AccentElements {
            dividers: "gradient",
            icons: "solid",
            product_card: "elevated",
        },
        banner_style: BannerStyle {
            overlay: "dark",
            gradient: "fade-bottom",
        },
    },
    Theme {
        id: "pastel-dream",
        name: "Pastel Dream",
        description: "Soft lavender and blush tones with rounded everything.",
        vibe: "playful",
        colors: ThemeColors {
            primary: "#A78BFA",
            background: "#FDF4FF",
            text: "#3B0764",
            accent: "#F9A8D4",
        },
        fonts: FontPair {
            heading: "Quicksand",
            body: "Nunito",
        },
        button_style: "pill",
        image_style: ImageStyle {
            border: "rounded",
            shadow: "soft",
        },
        accent_elements: AccentElements {
            dividers: "dotted",
            icons: "duotone",
            product_card: "outlined",
        },
        banner_style: BannerStyle {
            overlay: "light",
            gradient: "diagonal",
        },
    },
    Theme {
        id: "bold-pop",
        name: "Bold Pop",
        description: "High-contrast primaries and chunky type for loud creators.",
        vibe: "energetic",
        colors: ThemeColors {
            primary: "#DC2626",
            background: "#FEF08A",
            text: "#0A0A0A",
            accent: "#2563EB",
        },
        fonts: FontPair {
            heading: "Archivo Black",
            body: "Work Sans",
        },
        button_style: "sharp",
        image_style: ImageStyle {
            border: "thick",
            shadow: "hard",
        },
        accent_elements: AccentElements {
            dividers: "thick",
            icons: "solid",
            product_card: "brutal",
        },
        banner_style: BannerStyle {
            overlay: "none",
            gradient: "none",
        },
    },
    Theme {
        id: "earthy-organic",
        name: "Earthy Organic",
        description: "Warm sand, olive and clay for slow-living shops.",
        vibe: "calm",
        colors: ThemeColors {
            primary: "#6B7F3A",
            background: "#F5EFE6",
            text: "#3F2E1E",
            accent: "#C2703D",
        },
        fonts: FontPair {
            heading: "Fraunces",
            body: "Source Sans 3",
        },
        button_style: "rounded",
        image_style: ImageStyle {
            border: "none",
            shadow: "none",
        },
        accent_elements: AccentElements {
            dividers: "organic",
            icons: "outline",
            product_card: "flat",
        },
        banner_style: BannerStyle {
            overlay: "warm",
            gradient: "fade-bottom",
        },
    },
    Theme {
        id: "ocean-breeze",
        name: "Ocean Breeze",
        description: "Cool teal and sea-glass blues with airy spacing.",
        vibe: "fresh",
        colors: ThemeColors {
            primary: "#0E7490",
            background: "#F0FDFA",
            text: "#134E4A",
            accent: "#38BDF8",
        },
        fonts: FontPair {
            heading: "Poppins",
            body: "Open Sans",
        },
        button_style: "rounded",
        image_style: ImageStyle {
            border: "rounded",
            shadow: "soft",
        },
        accent_elements: AccentElements {
            dividers: "wave",
            icons: "outline",
            product_card: "elevated",
        },
        banner_style: BannerStyle {
            overlay: "light",
            gradient: "horizontal",
        },
    },
];

/// All themes in display order.
#[must_use]
pub fn themes() -> &'static [Theme] {
    THEMES
}

/// The fallback theme.
#[must_use]
pub fn default_theme() -> &'static Theme {
    &MINIMAL_LIGHT
}

/// Find a theme by id, falling back to the default theme.
#[must_use]
pub fn find_theme_by_id(id: &str) -> &'static Theme {
    THEMES
        .iter()
        .find(|theme| theme.id == id)
        .unwrap_or_else(default_theme)
}

/// Whether `id` names a catalog theme (no fallback).
#[must_use]
pub fn is_known_theme(id: &str) -> bool {
    THEMES.iter().any(|theme| theme.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ColorToken;

    #[test]
    fn test_default_theme_is_first_entry() {
        assert_eq!(default_theme().id, DEFAULT_THEME_ID);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        let theme = find_theme_by_id("does-not-exist");
        assert_eq!(theme, default_theme());
        assert!(!is_known_theme("does-not-exist"));
    }

    #[test]
    fn test_find_known_theme() {
        let theme = find_theme_by_id("midnight-luxe");
        assert_eq!(theme.name, "Midnight Luxe");
        assert!(is_known_theme("midnight-luxe"));
    }

    #[test]
    fn test_theme_ids_unique() {
        let ids: HashSet<_> = themes().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), themes().len());
    }

    #[test]
    fn test_catalog_colors_are_valid_tokens() {
        for theme in themes() {
            let colors = theme.colors;
            for value in [colors.primary, colors.background, colors.text, colors.accent] {
                assert!(ColorToken::is_valid(value), "{}: {value}", theme.id);
            }
        }
    }
}
