//! Theme registry – the fixed catalog of visual themes.
//!
//! Each theme is a small bundle of design tokens (colors, font stack,
//! display text) plus an id that selects one of the five layout renderers.
//! The catalog is process-wide constant data; lookup is total – an unknown
//! id resolves to the first entry rather than failing.

use serde::{Deserialize, Serialize};

/// Identifier of one of the five built-in themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Modern,
    Classic,
    Minimal,
    Executive,
    Creative,
}

impl ThemeId {
    /// The id string used by callers and the theme picker.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Modern => "modern",
            ThemeId::Classic => "classic",
            ThemeId::Minimal => "minimal",
            ThemeId::Executive => "executive",
            ThemeId::Creative => "creative",
        }
    }

    /// Parse an id string. Returns `None` for unknown ids; callers wanting
    /// the registry's fallback behavior should use [`resolve_theme`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "modern" => Some(ThemeId::Modern),
            "classic" => Some(ThemeId::Classic),
            "minimal" => Some(ThemeId::Minimal),
            "executive" => Some(ThemeId::Executive),
            "creative" => Some(ThemeId::Creative),
            _ => None,
        }
    }
}

/// Design tokens for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub id: ThemeId,
    pub name: &'static str,
    pub description: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub accent_color: &'static str,
    pub font_family: &'static str,
    /// Gradient used by an upstream theme-picker card. Not consumed by the
    /// renderers themselves.
    pub preview_background: &'static str,
}

static THEMES: [ThemeConfig; 5] = [
    ThemeConfig {
        id: ThemeId::Modern,
        name: "Modern Sidebar",
        description: "Two-column layout with colored sidebar",
        primary_color: "#2563eb",
        secondary_color: "#1e3a5f",
        accent_color: "#60a5fa",
        font_family: "'Segoe UI', Arial, sans-serif",
        preview_background: "linear-gradient(135deg, #2563eb 0%, #60a5fa 100%)",
    },
    ThemeConfig {
        id: ThemeId::Classic,
        name: "Classic Professional",
        description: "Traditional single-column with elegant typography",
        primary_color: "#374151",
        secondary_color: "#111827",
        accent_color: "#6b7280",
        font_family: "'Georgia', 'Times New Roman', serif",
        preview_background: "linear-gradient(135deg, #374151 0%, #6b7280 100%)",
    },
    ThemeConfig {
        id: ThemeId::Minimal,
        name: "Minimal Clean",
        description: "Ultra-clean with generous whitespace",
        primary_color: "#0f172a",
        secondary_color: "#1e293b",
        accent_color: "#64748b",
        font_family: "'Helvetica Neue', Arial, sans-serif",
        preview_background: "linear-gradient(135deg, #0f172a 0%, #334155 100%)",
    },
    ThemeConfig {
        id: ThemeId::Executive,
        name: "Executive Premium",
        description: "Premium look with gold accents",
        primary_color: "#92400e",
        secondary_color: "#451a03",
        accent_color: "#d97706",
        font_family: "'Georgia', serif",
        preview_background: "linear-gradient(135deg, #92400e 0%, #fbbf24 100%)",
    },
    ThemeConfig {
        id: ThemeId::Creative,
        name: "Creative Timeline",
        description: "Modern with visual timeline",
        primary_color: "#7c3aed",
        secondary_color: "#4c1d95",
        accent_color: "#a78bfa",
        font_family: "'Segoe UI', sans-serif",
        preview_background: "linear-gradient(135deg, #7c3aed 0%, #a78bfa 100%)",
    },
];

/// All registered themes, in stable presentation order.
pub fn themes() -> &'static [ThemeConfig] {
    &THEMES
}

/// Look up a theme by id string.
///
/// Total and deterministic: an id that matches no registry entry resolves
/// to the first entry ([`ThemeId::Modern`]). Never panics.
pub fn resolve_theme(id: &str) -> &'static ThemeConfig {
    ThemeId::parse(id)
        .and_then(|id| THEMES.iter().find(|t| t.id == id))
        .unwrap_or(&THEMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_entry_per_id() {
        assert_eq!(themes().len(), 5);
        for theme in themes() {
            let found: Vec<_> = themes().iter().filter(|t| t.id == theme.id).collect();
            assert_eq!(found.len(), 1, "duplicate entry for {:?}", theme.id);
        }
    }

    #[test]
    fn resolve_known_ids() {
        for theme in themes() {
            let resolved = resolve_theme(theme.id.as_str());
            assert_eq!(resolved.id, theme.id);
        }
    }

    #[test]
    fn resolve_unknown_id_falls_back_to_first() {
        let fallback = resolve_theme("not-a-real-id");
        assert_eq!(fallback.id, themes()[0].id);
        assert_eq!(resolve_theme(""), resolve_theme("not-a-real-id"));
    }

    #[test]
    fn id_strings_roundtrip() {
        for theme in themes() {
            assert_eq!(ThemeId::parse(theme.id.as_str()), Some(theme.id));
        }
        assert_eq!(ThemeId::parse("Modern"), None); // case-sensitive
    }
}
