//! Layout renderers – five interchangeable page templates.
//!
//! Each renderer is a pure function `(ProfileData, ThemeConfig) → markup`
//! implementing the same contract:
//!
//! - output is one self-contained HTML document (inline styles only) that
//!   represents a single A4 page;
//! - identical inputs produce byte-identical output;
//! - inputs are never mutated, no I/O is performed, and no well-formed
//!   profile causes a panic – empty lists render as empty sections;
//! - deep lists may be truncated, but always to a prefix.
//!
//! The templates stay inside the markup subset the engine understands
//! (`div`, `p`, `h1`–`h3`, `ul`/`li`, `table`/`tr`/`td`/`th`, `span`);
//! anything fancier would survive the Word export but vanish from the PDF.

mod classic;
mod creative;
mod executive;
mod minimal;
mod modern;

use crate::profile::ProfileData;
use crate::theme::{ThemeConfig, ThemeId};

/// A4 page geometry at 96 dpi. The engine lays out in px and converts to
/// PDF points at render time.
pub const PAGE_WIDTH_PX: f32 = 794.0;
pub const PAGE_HEIGHT_PX: f32 = 1123.0;

/// Render the markup document for `profile` using the layout selected by
/// `theme.id`. This is the single dispatch point keeping the registry and
/// the renderer set in 1:1 correspondence.
pub fn render_markup(profile: &ProfileData, theme: &ThemeConfig) -> String {
    let renderer = renderer_for(theme.id);
    renderer(profile, theme)
}

/// Renderer strategy type: one implementation per theme.
pub type Renderer = fn(&ProfileData, &ThemeConfig) -> String;

/// Map a theme id to its renderer.
pub fn renderer_for(id: ThemeId) -> Renderer {
    match id {
        ThemeId::Modern => modern::render,
        ThemeId::Classic => classic::render,
        ThemeId::Minimal => minimal::render,
        ThemeId::Executive => executive::render,
        ThemeId::Creative => creative::render,
    }
}

// ---------------------------------------------------------------------------
// Shared fragments
// ---------------------------------------------------------------------------

/// Escape text for safe embedding in markup text content or attribute
/// values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Uppercase initials from a display name ("Elena Vasquez" → "EV").
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Wrap rendered body content in a complete document shell.
///
/// The shell carries no styling of its own beyond a zero-margin body – the
/// page `<div>` each renderer emits is responsible for its A4 footprint and
/// internal padding.
pub fn document(title: &str, font_family: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html>\
         <head><meta charset=\"utf-8\"/><title>{title}</title></head>\
         <body style=\"margin:0;padding:0;background:#ffffff;color:#333333;font-family:{font}\">\
         {body}\
         </body>\
         </html>",
        title = escape(title),
        font = font_family,
        body = body,
    )
}

/// Style string for a renderer's outermost page `<div>`.
pub fn page_style(padding: &str, background: &str) -> String {
    format!(
        "width:{w}px;min-height:{h}px;background:{bg};padding:{pad};font-size:13px;line-height:1.4",
        w = PAGE_WIDTH_PX,
        h = PAGE_HEIGHT_PX,
        bg = background,
        pad = padding,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{default_profile, empty_profile};
    use crate::theme::themes;

    #[test]
    fn escape_covers_markup_metacharacters() {
        assert_eq!(escape("a & b <c> \"d\" 'e'"), "a &amp; b &lt;c&gt; &quot;d&quot; &#39;e&#39;");
    }

    #[test]
    fn initials_from_multiword_names() {
        assert_eq!(initials("Elena Vasquez"), "EV");
        assert_eq!(initials("Jane Q. Doe"), "JQD");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn every_theme_dispatches_to_a_renderer() {
        let profile = default_profile();
        for theme in themes() {
            let markup = render_markup(&profile, theme);
            assert!(markup.starts_with("<!DOCTYPE html>"), "{:?}", theme.id);
            assert!(markup.contains(&escape(&profile.name)), "{:?}", theme.id);
        }
    }

    #[test]
    fn renderers_are_deterministic() {
        let profile = default_profile();
        for theme in themes() {
            let a = render_markup(&profile, theme);
            let b = render_markup(&profile, theme);
            assert_eq!(a, b, "{:?} is not deterministic", theme.id);
        }
    }

    #[test]
    fn renderers_survive_an_empty_profile() {
        let profile = empty_profile();
        for theme in themes() {
            let markup = render_markup(&profile, theme);
            assert!(markup.contains("<body"), "{:?}", theme.id);
            assert!(!markup.contains("{}"), "{:?} leaked a placeholder", theme.id);
        }
    }
}
