//! Pagination – splits positioned boxes into zero-margin A4 pages.
//!
//! The renderers aim for a single page and bring their own internal
//! padding, so pages carry no outer margin. Content that still overflows is
//! handled here:
//! - oversized pure-container boxes are expanded so their children can
//!   split across pages individually;
//! - tables split between rows;
//! - everything else moves to the next page whole.
//!
//! This stage also freezes text runs: line wrapping came from layout, the
//! per-line x offsets for padding and text alignment are computed here.

use crate::fonts::FontManager;
use crate::layout::{BoxContent, PositionedBox};
use crate::page::*;
use crate::style::{self, ComputedStyle};

/// Recursively expand any pure-container box taller than a single page so
/// its children can be placed page by page.
fn flatten_for_pagination<'a>(
    boxes: &'a [PositionedBox],
    page_height: f32,
) -> Vec<&'a PositionedBox> {
    let mut result = Vec::new();
    for pbox in boxes {
        if pbox.height > page_height
            && matches!(pbox.content, BoxContent::None)
            && !pbox.children.is_empty()
        {
            result.extend(flatten_for_pagination(&pbox.children, page_height));
        } else {
            result.push(pbox);
        }
    }
    result
}

/// Convert positioned boxes into a paginated [`DocumentLayout`].
pub fn paginate(
    boxes: &[PositionedBox],
    page_width: f32,
    page_height: f32,
    fonts: &FontManager,
) -> DocumentLayout {
    let mut layout = DocumentLayout {
        title: String::new(),
        page_width_px: page_width,
        page_height_px: page_height,
        pages: Vec::new(),
    };

    let flat = flatten_for_pagination(boxes, page_height);

    let mut current_page = PageLayout {
        page_index: 0,
        boxes: Vec::new(),
    };

    // Document-space y at which the current page begins. PositionedBox.y
    // values are absolute document coordinates, so `pbox.y - page_start`
    // gives the y-on-page for any box.
    let mut page_start = 0.0f32;

    for pbox in &flat {
        let y_on_page = (pbox.y - page_start).max(0.0);

        if y_on_page + pbox.height > page_height && !current_page.boxes.is_empty() {
            if is_table_like(pbox) {
                split_table_box(
                    pbox,
                    &mut layout,
                    &mut current_page,
                    &mut page_start,
                    page_height,
                    fonts,
                );
                continue;
            }
            layout.pages.push(current_page);
            current_page = PageLayout {
                page_index: layout.pages.len(),
                boxes: Vec::new(),
            };
            page_start = pbox.y;
        }

        let y_on_page = (pbox.y - page_start).max(0.0);
        current_page
            .boxes
            .push(build_layout_box(pbox, pbox.x, y_on_page, fonts));
    }

    if !current_page.boxes.is_empty() {
        layout.pages.push(current_page);
    }
    if layout.pages.is_empty() {
        layout.pages.push(PageLayout {
            page_index: 0,
            boxes: Vec::new(),
        });
    }
    layout
}

fn is_table_like(pbox: &PositionedBox) -> bool {
    pbox.style.display == style::Display::Table && !pbox.children.is_empty()
}

/// Place a too-tall table row by row, starting fresh pages as rows run past
/// the page bottom.
fn split_table_box(
    pbox: &PositionedBox,
    layout: &mut DocumentLayout,
    current_page: &mut PageLayout,
    page_start: &mut f32,
    page_height: f32,
    fonts: &FontManager,
) {
    for row in &pbox.children {
        let y_on_page = (row.y - *page_start).max(0.0);
        if y_on_page + row.height > page_height && !current_page.boxes.is_empty() {
            layout.pages.push(std::mem::replace(
                current_page,
                PageLayout {
                    page_index: layout.pages.len(),
                    boxes: Vec::new(),
                },
            ));
            *page_start = row.y;
        }
        let y = (row.y - *page_start).max(0.0);
        current_page.boxes.push(build_layout_box(row, row.x, y, fonts));
    }
}

/// Recursively build a [`LayoutBox`] tree where every box carries
/// page-absolute coordinates (origin = top-left of the physical page).
///
/// Children derive their absolute y as `abs_y + (child.y − parent.y)`
/// because PositionedBox.y values are accumulated document-space absolutes.
fn build_layout_box(
    pbox: &PositionedBox,
    abs_x: f32,
    abs_y: f32,
    fonts: &FontManager,
) -> LayoutBox {
    let mut lb = LayoutBox::new(abs_x, abs_y, pbox.width, pbox.height);
    let s = &pbox.style;

    if !s.background_color.is_transparent() {
        let c = &s.background_color;
        lb.background_color = Some([c.r, c.g, c.b, c.a]);
    }

    lb.border_top = edge_to_border(&s.border_top);
    lb.border_right = edge_to_border(&s.border_right);
    lb.border_bottom = edge_to_border(&s.border_bottom);
    lb.border_left = edge_to_border(&s.border_left);

    match &pbox.content {
        BoxContent::Text { lines, .. } => {
            lb.text = Some(freeze_text(s, lines, pbox.width, fonts));
        }
        BoxContent::ListItem { marker } => {
            // The bullet is drawn in the left gutter; the item's text comes
            // from its child boxes.
            let c = &s.color;
            lb.text = Some(TextContent {
                lines: vec![],
                font_family: s.font_family.clone(),
                font_size: s.font_size,
                bold: s.font_weight == style::FontWeight::Bold,
                italic: false,
                color: [c.r, c.g, c.b, c.a],
                line_height: fonts.line_height_px(s.font_size, s.line_height),
                text_align: "left".to_string(),
                list_marker: Some(marker.clone()),
            });
        }
        BoxContent::None => {}
    }

    for child in &pbox.children {
        let child_abs_x = abs_x + (child.x - pbox.x);
        let child_abs_y = abs_y + (child.y - pbox.y);
        lb.children.push(build_layout_box(child, child_abs_x, child_abs_y, fonts));
    }

    lb
}

/// Freeze wrapped lines into positioned runs: padding plus alignment gives
/// each line its x offset, padding plus half-leading gives the y offsets.
fn freeze_text(
    s: &ComputedStyle,
    lines: &[String],
    box_width: f32,
    fonts: &FontManager,
) -> TextContent {
    let bold = s.font_weight == style::FontWeight::Bold;
    let italic = s.font_style == style::FontStyle::Italic;
    let line_height = fonts.line_height_px(s.font_size, s.line_height);
    let avail = (box_width
        - s.padding_left
        - s.padding_right
        - s.border_left.width
        - s.border_right.width)
        .max(0.0);
    // Approximate the CSS line box: centre the glyphs inside tall line
    // heights so badge-style text sits mid-box.
    let half_leading = ((line_height - s.font_size * 1.2) / 2.0).max(0.0);

    let text_lines: Vec<TextLine> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line_width =
                fonts.measure_text_width(line, s.font_size, bold, italic, &s.font_family);
            let align_offset = match s.text_align {
                style::TextAlign::Center => ((avail - line_width) / 2.0).max(0.0),
                style::TextAlign::Right => (avail - line_width).max(0.0),
                style::TextAlign::Left | style::TextAlign::Justify => 0.0,
            };
            TextLine {
                text: line.clone(),
                x_offset: s.padding_left + s.border_left.width + align_offset,
                y_offset: s.padding_top + s.border_top.width + i as f32 * line_height
                    + half_leading,
            }
        })
        .collect();

    let c = &s.color;
    TextContent {
        lines: text_lines,
        font_family: s.font_family.clone(),
        font_size: s.font_size,
        bold,
        italic,
        color: [c.r, c.g, c.b, c.a],
        line_height,
        text_align: match s.text_align {
            style::TextAlign::Center => "center",
            style::TextAlign::Right => "right",
            _ => "left",
        }
        .to_string(),
        list_marker: None,
    }
}

fn edge_to_border(edge: &style::Edge) -> Option<BorderStyle> {
    if edge.is_visible() {
        Some(BorderStyle {
            width: edge.width,
            color: [edge.color.r, edge.color.g, edge.color.b, edge.color.a],
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::markup::parse;
    use crate::style::build_styled_tree;
    use crate::templates::{PAGE_HEIGHT_PX, PAGE_WIDTH_PX};

    fn paginate_html(html: &str) -> DocumentLayout {
        let dom = parse(html);
        let styled = build_styled_tree(&dom, None);
        let fonts = FontManager::default();
        let boxes = compute_layout(&styled, PAGE_WIDTH_PX, &fonts);
        paginate(&boxes, PAGE_WIDTH_PX, PAGE_HEIGHT_PX, &fonts)
    }

    #[test]
    fn short_content_fits_one_page() {
        let layout = paginate_html("<p>Short text</p>");
        assert_eq!(layout.pages.len(), 1);
    }

    #[test]
    fn empty_input_still_yields_a_page() {
        let layout = paginate_html("");
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].boxes.is_empty());
    }

    #[test]
    fn long_content_spills_onto_more_pages() {
        let mut html = String::new();
        for i in 0..120 {
            html.push_str(&format!("<p>Paragraph {i} with some filler text</p>"));
        }
        let layout = paginate_html(&html);
        assert!(layout.pages.len() > 1, "got {} pages", layout.pages.len());
    }

    #[test]
    fn oversized_wrapper_is_flattened() {
        let mut inner = String::new();
        for i in 0..120 {
            inner.push_str(&format!("<p>Row {i}</p>"));
        }
        let layout = paginate_html(&format!("<div>{inner}</div>"));
        assert!(layout.pages.len() > 1);
    }

    #[test]
    fn centered_text_gets_an_x_offset() {
        let layout = paginate_html(
            r#"<div style="width:700px;text-align:center;font-size:20px">mid</div>"#,
        );
        let text = layout.pages[0].boxes[0].text.as_ref().unwrap();
        assert!(
            text.lines[0].x_offset > 100.0,
            "expected centering offset, got {}",
            text.lines[0].x_offset
        );
    }

    #[test]
    fn padding_reaches_the_line_offsets() {
        let layout =
            paginate_html(r#"<div style="width:400px;padding:15px">padded text</div>"#);
        let text = layout.pages[0].boxes[0].text.as_ref().unwrap();
        assert!((text.lines[0].x_offset - 15.0).abs() < 0.01);
        assert!(text.lines[0].y_offset >= 15.0);
    }
}
