//! Layout engine – uses Taffy to compute flexbox layout from a styled tree,
//! then converts the result into positioned boxes in document coordinates.
//!
//! Mapping rules, tuned to what the renderers emit:
//! - block-level elements stack as flex columns;
//! - `<table>` becomes a column of rows; cells honour explicit widths and
//!   share the remainder equally;
//! - a block whose children are all inline is merged into one wrapped text
//!   leaf (span chrome survives only in the Word/preview output – renderers
//!   use `display:flex` containers where chrome must reach the PDF);
//! - text leaves fill their container so text-align offsets have room.

use std::collections::HashMap;
use taffy::prelude::*;

use crate::fonts::{wrap_text, FontManager};
use crate::markup::Tag;
use crate::style::{self, ComputedStyle, StyledNode};

// ---------------------------------------------------------------------------
// Positioned boxes (pre-pagination)
// ---------------------------------------------------------------------------

/// A positioned box in document coordinates (before page splitting).
#[derive(Debug, Clone)]
pub struct PositionedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: ComputedStyle,
    pub content: BoxContent,
    pub children: Vec<PositionedBox>,
}

#[derive(Debug, Clone)]
pub enum BoxContent {
    None,
    Text {
        text: String,
        lines: Vec<String>,
    },
    /// List item bullet drawn in the left gutter.
    ListItem {
        marker: String,
    },
}

// ---------------------------------------------------------------------------
// Tree construction
// ---------------------------------------------------------------------------

/// How a text leaf claims horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafSizing {
    /// Fill the wrap width – used for merged blocks and bare text in block
    /// containers, so alignment offsets have the full line to work with.
    FillAvailable,
    /// Measured text width – used inside spans, which size to content.
    Content,
}

struct LayoutBuilder<'a> {
    taffy: TaffyTree<()>,
    fonts: &'a FontManager,
    node_styles: HashMap<NodeId, ComputedStyle>,
    node_content: HashMap<NodeId, BoxContent>,
    available_width: f32,
}

impl<'a> LayoutBuilder<'a> {
    fn new(fonts: &'a FontManager, available_width: f32) -> Self {
        Self {
            taffy: TaffyTree::new(),
            fonts,
            node_styles: HashMap::new(),
            node_content: HashMap::new(),
            available_width,
        }
    }

    /// Collect the text of an inline subtree, inserting a separating space
    /// at element boundaries that would otherwise glue words together.
    fn collect_inline_text(node: &StyledNode, out: &mut String) {
        match node {
            StyledNode::Text { text, .. } => out.push_str(text),
            StyledNode::Element { children, .. } => {
                if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                for child in children {
                    Self::collect_inline_text(child, out);
                }
            }
        }
    }

    /// True when every child is a text node or an inline element.
    fn all_inline(children: &[StyledNode]) -> bool {
        children.iter().all(|c| match c {
            StyledNode::Text { .. } => true,
            StyledNode::Element {
                style,
                children: gc,
                ..
            } => {
                matches!(
                    style.display,
                    style::Display::Inline | style::Display::InlineBlock
                ) && Self::all_inline(gc)
            }
        })
    }

    /// Containers that may merge their all-inline content into one wrapped
    /// text leaf. Flex containers never merge (their children are laid out
    /// as real boxes); list items keep their child leaves so the gutter
    /// marker stays separate.
    fn merges_inline_content(tag: &Tag, style: &ComputedStyle) -> bool {
        if style.display == style::Display::Flex {
            return false;
        }
        matches!(
            tag,
            Tag::P | Tag::H1 | Tag::H2 | Tag::H3 | Tag::Div | Tag::Td | Tag::Th | Tag::Span
        ) && !matches!(style.display, style::Display::ListItem)
    }

    fn build_node(&mut self, styled: &StyledNode, parent_width: f32, sizing: LeafSizing) -> NodeId {
        match styled {
            StyledNode::Text { text, style } => {
                self.build_text_node(text, style, parent_width, sizing)
            }
            StyledNode::Element {
                tag,
                style,
                children,
            } => self.build_element_node(tag, style, children, parent_width),
        }
    }

    fn build_text_node(
        &mut self,
        text: &str,
        style: &ComputedStyle,
        wrap_width: f32,
        sizing: LeafSizing,
    ) -> NodeId {
        let bold = style.font_weight == style::FontWeight::Bold;
        let italic = style.font_style == style::FontStyle::Italic;
        let family = &style.font_family;
        let font_size = style.font_size;
        let line_height_px = self.fonts.line_height_px(font_size, style.line_height);

        let max_w = if wrap_width > 0.0 {
            wrap_width
        } else {
            self.available_width
        };
        let normalized: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lines = wrap_text(&normalized, font_size, bold, italic, family, max_w, self.fonts);

        let width = match sizing {
            LeafSizing::FillAvailable => max_w,
            LeafSizing::Content => lines
                .iter()
                .map(|l| {
                    self.fonts
                        .measure_text_width(l, font_size, bold, italic, family)
                })
                .fold(0.0f32, f32::max),
        };
        let height = lines.len() as f32 * line_height_px;

        let taffy_style = Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            flex_shrink: 0.0,
            ..Default::default()
        };

        let node = self.taffy.new_leaf(taffy_style).unwrap();
        self.node_styles.insert(node, style.clone());
        self.node_content.insert(
            node,
            BoxContent::Text {
                text: normalized,
                lines,
            },
        );
        node
    }

    /// Merge a block's inline content into one wrapped text leaf carrying
    /// the block's own box properties (margins, padding, borders,
    /// background) so spacing and chrome survive.
    ///
    /// Block-level merges fill their parent's width; inline merges (spans,
    /// badge chips, pill tags) size to their content.
    fn build_merged_block(
        &mut self,
        style: &ComputedStyle,
        children: &[StyledNode],
        parent_width: f32,
    ) -> NodeId {
        let mut raw = String::new();
        for child in children {
            Self::collect_inline_text(child, &mut raw);
        }

        let is_inline_box = matches!(
            style.display,
            style::Display::Inline | style::Display::InlineBlock
        );
        let declared_width: Option<f32> = match style.width {
            style::Dimension::Px(w) => Some(w),
            style::Dimension::Percent(p) => Some(parent_width * p / 100.0),
            style::Dimension::Auto => None,
        };
        let horizontal_extras = style.padding_left
            + style.padding_right
            + style.border_left.width
            + style.border_right.width;
        let wrap_width = declared_width
            .unwrap_or(parent_width - style.margin_left - style.margin_right)
            - horizontal_extras;
        let wrap_width = wrap_width.max(1.0);

        let node = self.build_text_node(&raw, style, wrap_width, LeafSizing::FillAvailable);

        let my_width = match declared_width {
            Some(w) => w,
            None if is_inline_box => {
                // Content-sized: widest wrapped line plus padding/border.
                let bold = style.font_weight == style::FontWeight::Bold;
                let italic = style.font_style == style::FontStyle::Italic;
                let max_line = match &self.node_content[&node] {
                    BoxContent::Text { lines, .. } => lines
                        .iter()
                        .map(|l| {
                            self.fonts.measure_text_width(
                                l,
                                style.font_size,
                                bold,
                                italic,
                                &style.font_family,
                            )
                        })
                        .fold(0.0f32, f32::max),
                    _ => 0.0,
                };
                max_line + horizontal_extras
            }
            None => parent_width - style.margin_left - style.margin_right,
        };

        // Re-apply the block's spacing and sizing on the leaf's Taffy style
        // (Taffy sizes are border-box, so padding and border are included).
        let line_count = match &self.node_content[&node] {
            BoxContent::Text { lines, .. } => lines.len(),
            _ => 0,
        };
        let content_height =
            line_count as f32 * self.fonts.line_height_px(style.font_size, style.line_height);
        let box_height = match style.height {
            // A declared height wins (e.g. the fixed initials badge).
            style::Dimension::Px(h) => h,
            _ => {
                content_height
                    + style.padding_top
                    + style.padding_bottom
                    + style.border_top.width
                    + style.border_bottom.width
            }
        };

        let current = self.taffy.style(node).unwrap().clone();
        let updated = Style {
            margin: margin_rect(style),
            padding: padding_rect(style),
            border: border_rect(style),
            size: Size {
                width: Dimension::Length(my_width),
                height: Dimension::Length(box_height),
            },
            ..current
        };
        self.taffy.set_style(node, updated).unwrap();
        node
    }

    fn build_element_node(
        &mut self,
        tag: &Tag,
        style: &ComputedStyle,
        children: &[StyledNode],
        parent_width: f32,
    ) -> NodeId {
        if !children.is_empty()
            && Self::merges_inline_content(tag, style)
            && Self::all_inline(children)
        {
            return self.build_merged_block(style, children, parent_width);
        }

        let my_width = self.resolve_width(style, parent_width);
        let inner_width = (my_width - style.padding_left - style.padding_right).max(1.0);

        // Per-child wrap widths. Non-wrapping row containers (flex rows,
        // table rows) give each cell its declared width and split the
        // remainder among the rest.
        let row_like = *tag == Tag::Tr
            || (style.display == style::Display::Flex
                && style.flex_direction == style::FlexDirection::Row);
        let splits_width = row_like && style.flex_wrap == style::FlexWrap::NoWrap;
        let child_widths: Vec<f32> = if splits_width {
            self.row_child_widths(style, children, inner_width)
        } else {
            children.iter().map(|_| inner_width).collect()
        };

        // Bare text sizes to content inside spans and rows, and fills the
        // line inside block containers (so alignment offsets have room).
        let child_sizing = if *tag == Tag::Span || row_like {
            LeafSizing::Content
        } else {
            LeafSizing::FillAvailable
        };

        let mut child_nodes = Vec::new();
        for (child, width) in children.iter().zip(child_widths) {
            let li_marker: Option<String> = match child {
                StyledNode::Element {
                    tag: child_tag, ..
                } if *child_tag == Tag::Li => Some("\u{2022} ".to_string()),
                _ => None,
            };

            let child_id = self.build_node(child, width, child_sizing);
            if let Some(marker) = li_marker {
                self.node_content
                    .insert(child_id, BoxContent::ListItem { marker });
            }
            child_nodes.push(child_id);
        }

        let taffy_style = self.computed_to_taffy(style, tag);
        let node = self
            .taffy
            .new_with_children(taffy_style, &child_nodes)
            .unwrap();
        self.node_styles.insert(node, style.clone());
        node
    }

    fn resolve_width(&self, style: &ComputedStyle, parent_width: f32) -> f32 {
        match style.width {
            style::Dimension::Px(w) => w,
            style::Dimension::Percent(p) => parent_width * p / 100.0,
            style::Dimension::Auto => parent_width,
        }
    }

    /// Wrap widths for the element children of a row container: declared
    /// widths are honoured, the remainder is split equally. Text children
    /// (rare in rows) wrap at the full inner width.
    fn row_child_widths(
        &self,
        style: &ComputedStyle,
        children: &[StyledNode],
        inner_width: f32,
    ) -> Vec<f32> {
        let mut fixed_total = 0.0f32;
        let mut flex_count = 0usize;
        for child in children {
            match child {
                StyledNode::Element { style: cs, .. } => match cs.width {
                    style::Dimension::Px(w) => fixed_total += w,
                    style::Dimension::Percent(p) => fixed_total += inner_width * p / 100.0,
                    style::Dimension::Auto => flex_count += 1,
                },
                StyledNode::Text { .. } => {}
            }
        }
        let elem_count = children
            .iter()
            .filter(|c| matches!(c, StyledNode::Element { .. }))
            .count();
        let gap_total = style.gap * elem_count.saturating_sub(1) as f32;
        let per_flex =
            ((inner_width - fixed_total - gap_total) / flex_count.max(1) as f32).max(1.0);

        // Children with a declared width resolve it themselves against the
        // row's inner width; only auto cells need the computed share.
        children
            .iter()
            .map(|child| match child {
                StyledNode::Element { style: cs, .. } => match cs.width {
                    style::Dimension::Px(_) | style::Dimension::Percent(_) => inner_width,
                    style::Dimension::Auto => per_flex,
                },
                StyledNode::Text { .. } => inner_width,
            })
            .collect()
    }

    fn computed_to_taffy(&self, s: &ComputedStyle, tag: &Tag) -> Style {
        let mut ts = Style::default();

        // HTML table model: flex regardless of computed display.
        match tag {
            Tag::Table => {
                ts.display = taffy::Display::Flex;
                ts.flex_direction = taffy::FlexDirection::Column;
                ts.size.width = self.dim_to_taffy(s.width);
                ts.size.height = self.dim_to_taffy(s.height);
                ts.min_size.width = Dimension::Length(0.0);
                ts.margin = margin_rect(s);
                ts.padding = padding_rect(s);
                return ts;
            }
            Tag::Tr => {
                ts.display = taffy::Display::Flex;
                ts.flex_direction = taffy::FlexDirection::Row;
                ts.align_items = Some(taffy::AlignItems::Stretch);
                ts.size.width = Dimension::Percent(1.0);
                ts.min_size.width = Dimension::Length(0.0);
                ts.margin = margin_rect(s);
                return ts;
            }
            Tag::Td | Tag::Th => {
                ts.display = taffy::Display::Flex;
                ts.flex_direction = taffy::FlexDirection::Column;
                match s.width {
                    // Declared width pins the column.
                    style::Dimension::Px(_) | style::Dimension::Percent(_) => {
                        ts.size.width = self.dim_to_taffy(s.width);
                        ts.flex_grow = 0.0;
                        ts.flex_shrink = 0.0;
                    }
                    // Auto cells share the remainder equally.
                    style::Dimension::Auto => {
                        ts.flex_grow = 1.0;
                        ts.flex_shrink = 1.0;
                        ts.flex_basis = Dimension::Length(0.0);
                    }
                }
                ts.min_size.width = Dimension::Length(0.0);
                ts.padding = padding_rect(s);
                ts.border = border_rect(s);
                return ts;
            }
            _ => {}
        }

        match s.display {
            style::Display::Flex => {
                ts.display = taffy::Display::Flex;
                ts.flex_direction = match s.flex_direction {
                    style::FlexDirection::Row => taffy::FlexDirection::Row,
                    style::FlexDirection::Column => taffy::FlexDirection::Column,
                };
                ts.flex_wrap = match s.flex_wrap {
                    style::FlexWrap::NoWrap => taffy::FlexWrap::NoWrap,
                    style::FlexWrap::Wrap => taffy::FlexWrap::Wrap,
                };
                ts.justify_content = Some(match s.justify_content {
                    style::JustifyContent::Start => taffy::JustifyContent::Start,
                    style::JustifyContent::End => taffy::JustifyContent::End,
                    style::JustifyContent::Center => taffy::JustifyContent::Center,
                    style::JustifyContent::SpaceBetween => taffy::JustifyContent::SpaceBetween,
                });
                ts.align_items = Some(match s.align_items {
                    style::AlignItems::Start => taffy::AlignItems::Start,
                    style::AlignItems::End => taffy::AlignItems::End,
                    style::AlignItems::Center => taffy::AlignItems::Center,
                    style::AlignItems::Stretch => taffy::AlignItems::Stretch,
                });
            }
            style::Display::Block
            | style::Display::ListItem
            | style::Display::Table
            | style::Display::TableRow
            | style::Display::TableCell
            | style::Display::InlineBlock => {
                // Block-level elements stack vertically.
                ts.display = taffy::Display::Flex;
                ts.flex_direction = taffy::FlexDirection::Column;
            }
            style::Display::Inline => {
                ts.display = taffy::Display::Flex;
                ts.flex_direction = taffy::FlexDirection::Row;
                ts.flex_wrap = taffy::FlexWrap::Wrap;
            }
            style::Display::None => {
                ts.display = taffy::Display::None;
            }
        }

        ts.size = Size {
            width: self.dim_to_taffy(s.width),
            height: self.dim_to_taffy(s.height),
        };
        ts.min_size = Size {
            width: Dimension::Auto,
            height: self.dim_to_taffy(s.min_height),
        };
        ts.flex_grow = s.flex_grow;
        ts.flex_shrink = s.flex_shrink;
        if s.flex_grow > 0.0 {
            ts.flex_basis = Dimension::Length(0.0);
            ts.min_size.width = Dimension::Length(0.0);
        }
        ts.margin = margin_rect(s);
        ts.padding = padding_rect(s);
        ts.border = border_rect(s);
        ts.gap = Size {
            width: LengthPercentage::Length(s.gap),
            height: LengthPercentage::Length(s.gap),
        };

        ts
    }

    fn dim_to_taffy(&self, d: style::Dimension) -> Dimension {
        match d {
            style::Dimension::Auto => Dimension::Auto,
            style::Dimension::Px(v) => Dimension::Length(v),
            style::Dimension::Percent(v) => Dimension::Percent(v / 100.0),
        }
    }

    /// Extract positioned boxes after layout computation.
    fn extract(&self, node: NodeId, offset_x: f32, offset_y: f32) -> PositionedBox {
        let layout = self.taffy.layout(node).unwrap();
        let style = self.node_styles.get(&node).cloned().unwrap_or_default();
        let content = self
            .node_content
            .get(&node)
            .cloned()
            .unwrap_or(BoxContent::None);

        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;

        let children: Vec<PositionedBox> = self
            .taffy
            .children(node)
            .unwrap_or_default()
            .iter()
            .map(|&child| self.extract(child, x, y))
            .collect();

        PositionedBox {
            x,
            y,
            width: layout.size.width,
            height: layout.size.height,
            style,
            content,
            children,
        }
    }
}

fn margin_rect(s: &ComputedStyle) -> Rect<LengthPercentageAuto> {
    Rect {
        top: LengthPercentageAuto::Length(s.margin_top),
        right: LengthPercentageAuto::Length(s.margin_right),
        bottom: LengthPercentageAuto::Length(s.margin_bottom),
        left: LengthPercentageAuto::Length(s.margin_left),
    }
}

fn padding_rect(s: &ComputedStyle) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(s.padding_top),
        right: LengthPercentage::Length(s.padding_right),
        bottom: LengthPercentage::Length(s.padding_bottom),
        left: LengthPercentage::Length(s.padding_left),
    }
}

fn border_rect(s: &ComputedStyle) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(s.border_top.width),
        right: LengthPercentage::Length(s.border_right.width),
        bottom: LengthPercentage::Length(s.border_bottom.width),
        left: LengthPercentage::Length(s.border_left.width),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute layout for a styled tree, returning top-level positioned boxes in
/// document coordinates. `available_width` is the full page width – pages
/// carry no outer margin, the page element brings its own padding.
pub fn compute_layout(
    styled_nodes: &[StyledNode],
    available_width: f32,
    fonts: &FontManager,
) -> Vec<PositionedBox> {
    let mut builder = LayoutBuilder::new(fonts, available_width);

    let mut child_ids = Vec::new();
    for node in styled_nodes {
        child_ids.push(builder.build_node(node, available_width, LeafSizing::FillAvailable));
    }

    let root_style = Style {
        display: taffy::Display::Flex,
        flex_direction: taffy::FlexDirection::Column,
        size: Size {
            width: Dimension::Length(available_width),
            height: Dimension::Auto,
        },
        ..Default::default()
    };
    let root = builder
        .taffy
        .new_with_children(root_style, &child_ids)
        .unwrap();

    builder
        .taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(available_width),
                height: AvailableSpace::MaxContent,
            },
        )
        .unwrap();

    let root_box = builder.extract(root, 0.0, 0.0);
    root_box.children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;
    use crate::style::build_styled_tree;

    fn layout(html: &str) -> Vec<PositionedBox> {
        let dom = parse(html);
        let styled = build_styled_tree(&dom, None);
        let fonts = FontManager::default();
        compute_layout(&styled, 794.0, &fonts)
    }

    #[test]
    fn paragraph_produces_a_sized_box() {
        let boxes = layout("<p>Hello world</p>");
        assert!(!boxes.is_empty());
        assert!(boxes[0].width > 0.0);
        assert!(boxes[0].height > 0.0);
    }

    #[test]
    fn table_cells_honor_declared_width() {
        let boxes = layout(
            r#"<table style="width:100%"><tr>
               <td style="width:220px">sidebar</td>
               <td>main</td>
               </tr></table>"#,
        );
        let table = &boxes[0];
        let row = &table.children[0];
        assert_eq!(row.children.len(), 2);
        let sidebar = &row.children[0];
        let main = &row.children[1];
        assert!((sidebar.width - 220.0).abs() < 1.0, "sidebar width {}", sidebar.width);
        assert!(main.width > 500.0, "main column should take the rest, got {}", main.width);
    }

    #[test]
    fn merged_paragraph_spans_keep_word_separation() {
        let boxes = layout("<p><span>Alpha</span><span>Beta</span></p>");
        let BoxContent::Text { text, .. } = &boxes[0].content else {
            panic!("expected merged text");
        };
        assert_eq!(text, "Alpha Beta");
    }

    #[test]
    fn list_items_carry_markers() {
        let boxes = layout("<ul><li>One</li><li>Two</li></ul>");
        let ul = &boxes[0];
        assert_eq!(ul.children.len(), 2);
        for li in &ul.children {
            assert!(matches!(&li.content, BoxContent::ListItem { marker } if marker.starts_with('\u{2022}')));
        }
    }

    #[test]
    fn explicit_height_is_respected() {
        let boxes = layout(r#"<div style="width:40px;height:3px;background:#000000"></div>"#);
        assert!((boxes[0].height - 3.0).abs() < 0.5);
        assert!((boxes[0].width - 40.0).abs() < 0.5);
    }

    #[test]
    fn min_height_stretches_the_page_box() {
        let boxes = layout(r#"<div style="min-height:1123px"><p>short</p></div>"#);
        assert!(boxes[0].height >= 1123.0 - 0.5, "page height {}", boxes[0].height);
    }

    #[test]
    fn flex_row_places_children_side_by_side() {
        let boxes = layout(
            r#"<div style="display:flex;gap:6px">
               <span style="display:inline-block;padding:2px 5px;background:#eeeeee">A</span>
               <span style="display:inline-block;padding:2px 5px;background:#eeeeee">B</span>
               </div>"#,
        );
        let row = &boxes[0];
        assert_eq!(row.children.len(), 2);
        let (a, b) = (&row.children[0], &row.children[1]);
        assert!((a.y - b.y).abs() < 0.5, "children should share a row");
        assert!(b.x > a.x + a.width - 0.5, "children should not overlap");
    }
}
