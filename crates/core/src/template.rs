//! Template catalog.
//!
//! A template is the starting point a user picks when creating a storefront:
//! a default palette, font pairing and layout, plus the theme that supplies
//! the style tokens templates do not define. Unlike themes, an unknown
//! template id is a caller error; see [`find_template_by_id`].

use serde::Serialize;

use crate::theme::FontPair;

/// Five-color palette a template seeds a storefront with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

/// Default layout metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLayout {
    /// One of `compact`, `comfortable`, `spacious`.
    pub spacing: &'static str,
    pub container_width: &'static str,
    pub border_radius: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Path of the preview image under `/static/templates/`.
    pub preview: &'static str,
    pub features: &'static [&'static str],
    pub colors: TemplateColors,
    pub fonts: FontPair,
    pub layout: TemplateLayout,
    /// Theme implied by this template when the storefront has not picked one.
    pub default_theme: &'static str,
}

/// Values used when a storefront has no template, or references one that no
/// longer exists.
pub const BASELINE: Template = Template {
    id: "baseline",
    name: "Baseline",
    description: "Plain white page with black sans-serif text.",
    preview: "/static/templates/baseline.png",
    features: &[],
    colors: TemplateColors {
        primary: "#000000",
        secondary: "#4B5563",
        accent: "#2563EB",
        background: "#FFFFFF",
        text: "#000000",
    },
    fonts: FontPair {
        heading: "sans-serif",
        body: "sans-serif",
    },
    layout: TemplateLayout {
        spacing: "comfortable",
        container_width: "1200px",
        border_radius: "8px",
    },
    default_theme: crate::theme::DEFAULT_THEME_ID,
};

static TEMPLATES: &[Template] = &[
    Template {
        id: "sleek-noir",
        name: "Sleek Noir",
        description: "Dark, editorial storefront for fashion and nightlife curators.",
        preview: "/static/templates/sleek-noir.png",
        features: &["Full-bleed hero banner", "Product grid", "Collab highlights"],
        colors: TemplateColors {
            primary: "#111112",
            secondary: "#27272A",
            accent: "#A855F7",
            background: "#18181B",
            text: "#FAFAFA",
        },
        fonts: FontPair {
            heading: "Playfair Display",
            body: "Inter",
        },
        layout: TemplateLayout {
            spacing: "spacious",
            container_width: "1280px",
            border_radius: "4px",
        },
        default_theme: "midnight-luxe",
    },
    Template {
        id: "minimal-canvas",
        name: "Minimal Canvas",
        description: "Airy white layout that puts products first.",
        preview: "/static/templates/minimal-canvas.png",
        features: &["Centered header", "Product grid", "Newsletter block"],
        colors: TemplateColors {
            primary: "#111827",
            secondary: "#6B7280",
            accent: "#2563EB",
            background: "#FFFFFF",
            text: "#111827",
        },
        fonts: FontPair {
            heading: "Inter",
            body: "Inter",
        },
        layout: TemplateLayout {
            spacing: "comfortable",
            container_width: "1120px",
            border_radius: "8px",
        },
        default_theme: "minimal-light",
    },
    Template {
        id: "sunset-boutique",
        name: "Sunset Boutique",
        description: "Warm gradients and rounded cards for lifestyle creators.",
        preview: "/static/templates/sunset-boutique.png",
        features: &["Gradient banner", "Rounded product cards", "Social links bar"],
        colors: TemplateColors {
            primary: "#EA580C",
            secondary: "#FDBA74",
            accent: "#DB2777",
            background: "#FFF7ED",
            text: "#431407",
        },
        fonts: FontPair {
            heading: "Poppins",
            body: "Nunito",
        },
        layout: TemplateLayout {
            spacing: "comfortable",
            container_width: "1200px",
            border_radius: "16px",
        },
        default_theme: "pastel-dream",
    },
    Template {
        id: "creator-grid",
        name: "Creator Grid",
        description: "Dense grid for creators with large catalogs.",
        preview: "/static/templates/creator-grid.png",
        features: &["Sidebar navigation", "Compact product grid", "Collections"],
        colors: TemplateColors {
            primary: "#DC2626",
            secondary: "#1F2937",
            accent: "#FACC15",
            background: "#FFFFFF",
            text: "#0A0A0A",
        },
        fonts: FontPair {
            heading: "Archivo Black",
            body: "Work Sans",
        },
        layout: TemplateLayout {
            spacing: "compact",
            container_width: "100%",
            border_radius: "0px",
        },
        default_theme: "bold-pop",
    },
    Template {
        id: "field-notes",
        name: "Field Notes",
        description: "Earthy, story-driven layout with long-form sections.",
        preview: "/static/templates/field-notes.png",
        features: &["Story sections", "Product spotlight", "Subscriber capture"],
        colors: TemplateColors {
            primary: "#6B7F3A",
            secondary: "#A3A380",
            accent: "#C2703D",
            background: "#F5EFE6",
            text: "#3F2E1E",
        },
        fonts: FontPair {
            heading: "Fraunces",
            body: "Source Sans 3",
        },
        layout: TemplateLayout {
            spacing: "spacious",
            container_width: "960px",
            border_radius: "12px",
        },
        default_theme: "earthy-organic",
    },
];

/// All templates in display order.
#[must_use]
pub fn templates() -> &'static [Template] {
    TEMPLATES
}

/// Find a template by id.
///
/// Returns `None` for unknown ids; callers writing settings must treat that
/// as invalid input.
#[must_use]
pub fn find_template_by_id(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}
