//! Page model – the intermediate representation between layout computation
//! and the output sinks. This is the "frozen" structure that encodes exactly
//! what goes on each page, in page-absolute px coordinates.

use serde::{Deserialize, Serialize};

/// A complete paginated document ready for rasterisation and PDF assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    /// Width of each page in px (A4 at 96 dpi).
    pub page_width_px: f32,
    /// Height of each page in px.
    pub page_height_px: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned rectangle with optional chrome and content. Coordinates are
/// relative to the page top-left, in px.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    /// Fill behind the box, RGBA 0.0–1.0.
    pub background_color: Option<[f32; 4]>,
    /// Border rules, one slot per side.
    pub border_top: Option<BorderStyle>,
    pub border_right: Option<BorderStyle>,
    pub border_bottom: Option<BorderStyle>,
    pub border_left: Option<BorderStyle>,

    /// Wrapped text runs, if this box carries text.
    pub text: Option<TextContent>,

    /// Children (nested boxes).
    pub children: Vec<LayoutBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderStyle {
    pub width: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Pre-wrapped lines.
    pub lines: Vec<TextLine>,
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: [f32; 4],
    pub line_height: f32,
    /// "left" | "center" | "right" (justify renders as left).
    pub text_align: String,
    /// List bullet prefix drawn in the left gutter (e.g. "\u{2022} ").
    pub list_marker: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// X offset within the box, already adjusted for text alignment.
    pub x_offset: f32,
    /// Y offset from the top of the text content area.
    pub y_offset: f32,
}

impl DocumentLayout {
    /// Create an empty A4 document layout.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            page_width_px: crate::templates::PAGE_WIDTH_PX,
            page_height_px: crate::templates::PAGE_HEIGHT_PX,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "cv-forge output".to_string()
    }

    /// Serialise to JSON (used by tests and debugging dumps).
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: None,
            border_top: None,
            border_right: None,
            border_bottom: None,
            border_left: None,
            text: None,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_geometry() {
        let layout = DocumentLayout::a4();
        assert_eq!(layout.page_width_px, 794.0);
        assert_eq!(layout.page_height_px, 1123.0);
        assert!(layout.pages.is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let mut layout = DocumentLayout::a4();
        let mut lbox = LayoutBox::new(10.0, 20.0, 100.0, 30.0);
        lbox.background_color = Some([0.1, 0.2, 0.3, 1.0]);
        layout.pages.push(PageLayout {
            page_index: 0,
            boxes: vec![lbox],
        });
        let parsed = DocumentLayout::from_json(&layout.to_json()).unwrap();
        assert_eq!(parsed.pages.len(), 1);
        assert_eq!(parsed.pages[0].boxes.len(), 1);
        assert!((parsed.pages[0].boxes[0].x - 10.0).abs() < 0.001);
    }
}
