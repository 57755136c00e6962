//! Style resolver – maps inline `style` declarations to a flat
//! [`ComputedStyle`] consumed by the layout engine.
//!
//! The renderers style every element inline, so there is no cascade beyond
//! tag defaults plus inherited text properties. Unknown properties are
//! ignored; a declaration the engine cannot honour degrades the PDF, never
//! the export.

use crate::markup::{Element, Node, Tag};

/// Fully resolved style for a single element.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    // Display / layout
    pub display: Display,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub gap: f32,

    // Sizing (px)
    pub width: Dimension,
    pub height: Dimension,
    pub min_height: Dimension,

    // Spacing (px)
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub padding_top: f32,
    pub padding_right: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,

    // Borders, per side
    pub border_top: Edge,
    pub border_right: Edge,
    pub border_bottom: Edge,
    pub border_left: Edge,

    // Typography
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub font_family: String,
    pub color: Color,
    pub text_align: TextAlign,
    pub line_height: f32,

    // Background
    pub background_color: Color,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            justify_content: JustifyContent::Start,
            align_items: AlignItems::Stretch,
            gap: 0.0,
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_height: Dimension::Auto,
            margin_top: 0.0,
            margin_right: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            padding_top: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
            padding_left: 0.0,
            border_top: Edge::NONE,
            border_right: Edge::NONE,
            border_bottom: Edge::NONE,
            border_left: Edge::NONE,
            font_size: 13.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            font_family: "Arial, sans-serif".to_string(),
            color: Color::BLACK,
            text_align: TextAlign::Left,
            line_height: 1.4,
            background_color: Color::TRANSPARENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Flex,
    Inline,
    InlineBlock,
    Table,
    TableRow,
    TableCell,
    ListItem,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JustifyContent {
    Start,
    End,
    Center,
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignItems {
    Start,
    End,
    Center,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Auto,
    Px(f32),
    Percent(f32),
}

/// One border edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub width: f32,
    pub color: Color,
}

impl Edge {
    pub const NONE: Self = Self {
        width: 0.0,
        color: Color::BLACK,
    };

    pub fn is_visible(&self) -> bool {
        self.width > 0.05 && !self.color.is_transparent()
    }
}

/// RGBA colour, components 0.0 – 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
            Some(Self { r, g, b, a: 1.0 })
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()? as f32 / 255.0;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()? as f32 / 255.0;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()? as f32 / 255.0;
            Some(Self { r, g, b, a: 1.0 })
        } else {
            None
        }
    }

    /// Parse any colour form the renderers emit: `#rrggbb`, `#rgb`,
    /// `rgb(r,g,b)`, `rgba(r,g,b,a)`, `transparent`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        if value.starts_with('#') {
            return Self::from_hex(value);
        }
        let (alpha_expected, inner) = if let Some(rest) = value.strip_prefix("rgba(") {
            (true, rest.strip_suffix(')')?)
        } else if let Some(rest) = value.strip_prefix("rgb(") {
            (false, rest.strip_suffix(')')?)
        } else {
            return None;
        };
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != if alpha_expected { 4 } else { 3 } {
            return None;
        }
        let r = parts[0].parse::<f32>().ok()? / 255.0;
        let g = parts[1].parse::<f32>().ok()? / 255.0;
        let b = parts[2].parse::<f32>().ok()? / 255.0;
        let a = if alpha_expected {
            parts[3].parse::<f32>().ok()?
        } else {
            1.0
        };
        Some(Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Style resolution
// ---------------------------------------------------------------------------

/// Resolve the style for an element, inheriting text properties from its
/// parent.
pub fn resolve_style(element: &Element, parent: Option<&ComputedStyle>) -> ComputedStyle {
    let mut style = base_style_for_tag(&element.tag);

    if let Some(p) = parent {
        style.font_size = p.font_size;
        style.font_weight = p.font_weight;
        style.font_style = p.font_style;
        style.font_family = p.font_family.clone();
        style.color = p.color;
        style.text_align = p.text_align;
        style.line_height = p.line_height;
    }

    // Tag defaults that must win over inheritance.
    if matches!(element.tag, Tag::Th) {
        style.font_weight = FontWeight::Bold;
    }

    if let Some(inline) = element.inline_style() {
        apply_inline_style(&mut style, inline);
    }

    style
}

/// Default styles based on tag semantics. The renderers set nearly all
/// spacing explicitly, so defaults stay light: just enough for a bare
/// fragment to look sane.
fn base_style_for_tag(tag: &Tag) -> ComputedStyle {
    let mut s = ComputedStyle::default();
    match tag {
        Tag::H1 => {
            s.font_size = 28.0;
            s.font_weight = FontWeight::Bold;
            s.margin_bottom = 10.0;
        }
        Tag::H2 => {
            s.font_size = 22.0;
            s.font_weight = FontWeight::Bold;
            s.margin_bottom = 8.0;
        }
        Tag::H3 => {
            s.font_size = 17.0;
            s.font_weight = FontWeight::Bold;
            s.margin_bottom = 6.0;
        }
        Tag::P => {
            s.margin_bottom = 8.0;
        }
        Tag::Ul => {
            s.padding_left = 20.0;
            s.margin_bottom = 8.0;
        }
        Tag::Li => {
            s.display = Display::ListItem;
            s.margin_bottom = 2.0;
        }
        Tag::Table => {
            s.display = Display::Table;
        }
        Tag::Tr => {
            s.display = Display::TableRow;
        }
        Tag::Td | Tag::Th => {
            // Layout tables: no implicit chrome, the renderer adds its own.
            s.display = Display::TableCell;
        }
        Tag::Span => {
            s.display = Display::Inline;
        }
        Tag::Div | Tag::Body | Tag::Html => {}
        Tag::Head | Tag::Title | Tag::Meta | Tag::Unknown(_) => {
            s.display = Display::None;
        }
    }
    s
}

fn apply_inline_style(s: &mut ComputedStyle, style_str: &str) {
    for decl in style_str.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let mut parts = decl.splitn(2, ':');
        let (Some(prop), Some(val)) = (parts.next(), parts.next()) else {
            continue;
        };
        apply_property(s, prop.trim(), val.trim());
    }
}

fn apply_property(s: &mut ComputedStyle, prop: &str, val: &str) {
    match prop {
        "display" => {
            s.display = match val {
                "flex" => Display::Flex,
                "block" => Display::Block,
                "inline" => Display::Inline,
                "inline-block" => Display::InlineBlock,
                "none" => Display::None,
                _ => s.display,
            }
        }
        "flex-direction" => {
            s.flex_direction = match val {
                "column" => FlexDirection::Column,
                _ => FlexDirection::Row,
            }
        }
        "flex-wrap" => {
            s.flex_wrap = match val {
                "wrap" => FlexWrap::Wrap,
                _ => FlexWrap::NoWrap,
            }
        }
        "flex" => {
            // Only the single-number shorthand is used by the renderers.
            if let Ok(grow) = val.parse::<f32>() {
                s.flex_grow = grow;
                s.flex_shrink = 1.0;
            }
        }
        "justify-content" => {
            s.justify_content = match val {
                "flex-end" | "end" => JustifyContent::End,
                "center" => JustifyContent::Center,
                "space-between" => JustifyContent::SpaceBetween,
                _ => JustifyContent::Start,
            }
        }
        "align-items" => {
            s.align_items = match val {
                "flex-start" | "start" => AlignItems::Start,
                "flex-end" | "end" => AlignItems::End,
                "center" => AlignItems::Center,
                _ => AlignItems::Stretch,
            }
        }
        "gap" => {
            if let Some(px) = parse_px(val) {
                s.gap = px;
            }
        }
        "width" => s.width = parse_dimension(val),
        "height" => s.height = parse_dimension(val),
        "min-height" => s.min_height = parse_dimension(val),
        "margin" => apply_shorthand_spacing(
            val,
            &mut s.margin_top,
            &mut s.margin_right,
            &mut s.margin_bottom,
            &mut s.margin_left,
        ),
        "margin-top" => apply_px(val, &mut s.margin_top),
        "margin-right" => apply_px(val, &mut s.margin_right),
        "margin-bottom" => apply_px(val, &mut s.margin_bottom),
        "margin-left" => apply_px(val, &mut s.margin_left),
        "padding" => apply_shorthand_spacing(
            val,
            &mut s.padding_top,
            &mut s.padding_right,
            &mut s.padding_bottom,
            &mut s.padding_left,
        ),
        "padding-top" => apply_px(val, &mut s.padding_top),
        "padding-right" => apply_px(val, &mut s.padding_right),
        "padding-bottom" => apply_px(val, &mut s.padding_bottom),
        "padding-left" => apply_px(val, &mut s.padding_left),
        "border" => {
            if let Some(edge) = parse_edge(val) {
                s.border_top = edge;
                s.border_right = edge;
                s.border_bottom = edge;
                s.border_left = edge;
            }
        }
        "border-top" => {
            if let Some(edge) = parse_edge(val) {
                s.border_top = edge;
            }
        }
        "border-right" => {
            if let Some(edge) = parse_edge(val) {
                s.border_right = edge;
            }
        }
        "border-bottom" => {
            if let Some(edge) = parse_edge(val) {
                s.border_bottom = edge;
            }
        }
        "border-left" => {
            if let Some(edge) = parse_edge(val) {
                s.border_left = edge;
            }
        }
        "font-size" => apply_px(val, &mut s.font_size),
        "font-weight" => {
            s.font_weight = match val {
                "bold" | "600" | "700" | "800" | "900" => FontWeight::Bold,
                _ => FontWeight::Normal,
            }
        }
        "font-style" => {
            s.font_style = match val {
                "italic" => FontStyle::Italic,
                _ => FontStyle::Normal,
            }
        }
        "font-family" => {
            s.font_family = val.to_string();
        }
        "color" => {
            if let Some(c) = Color::parse(val) {
                s.color = c;
            }
        }
        "background" | "background-color" => {
            if let Some(c) = Color::parse(val) {
                s.background_color = c;
            }
        }
        "text-align" => {
            s.text_align = match val {
                "center" => TextAlign::Center,
                "right" => TextAlign::Right,
                "justify" => TextAlign::Justify,
                _ => TextAlign::Left,
            }
        }
        "line-height" => {
            if let Ok(factor) = val.parse::<f32>() {
                s.line_height = factor;
            } else if let Some(px) = parse_px(val) {
                if s.font_size > 0.0 {
                    s.line_height = px / s.font_size;
                }
            }
        }
        // letter-spacing, border-radius, text-transform, etc. shape the
        // Word/preview rendering; the engine has no use for them.
        _ => {}
    }
}

fn apply_px(val: &str, target: &mut f32) {
    if let Some(px) = parse_px(val) {
        *target = px;
    }
}

fn parse_px(s: &str) -> Option<f32> {
    s.trim().trim_end_matches("px").trim().parse().ok()
}

fn parse_dimension(s: &str) -> Dimension {
    let s = s.trim();
    if s == "auto" {
        Dimension::Auto
    } else if let Some(pct) = s.strip_suffix('%') {
        pct.trim()
            .parse::<f32>()
            .map(Dimension::Percent)
            .unwrap_or(Dimension::Auto)
    } else {
        parse_px(s).map(Dimension::Px).unwrap_or(Dimension::Auto)
    }
}

/// Parse a `<width> <style> <color>` border shorthand, e.g.
/// `3px solid #2563eb`. The line style keyword is accepted and ignored –
/// every visible edge draws solid.
fn parse_edge(val: &str) -> Option<Edge> {
    let mut width: Option<f32> = None;
    let mut color: Option<Color> = None;
    for token in val.split_whitespace() {
        if token == "none" {
            return Some(Edge::NONE);
        }
        if width.is_none() {
            if let Some(px) = parse_px(token) {
                width = Some(px);
                continue;
            }
        }
        if let Some(c) = Color::parse(token) {
            color = Some(c);
        }
    }
    Some(Edge {
        width: width?,
        color: color.unwrap_or(Color::BLACK),
    })
}

fn apply_shorthand_spacing(
    val: &str,
    top: &mut f32,
    right: &mut f32,
    bottom: &mut f32,
    left: &mut f32,
) {
    let parts: Vec<f32> = val.split_whitespace().filter_map(parse_px).collect();
    match parts.len() {
        1 => {
            *top = parts[0];
            *right = parts[0];
            *bottom = parts[0];
            *left = parts[0];
        }
        2 => {
            *top = parts[0];
            *bottom = parts[0];
            *right = parts[1];
            *left = parts[1];
        }
        3 => {
            *top = parts[0];
            *right = parts[1];
            *left = parts[1];
            *bottom = parts[2];
        }
        4 => {
            *top = parts[0];
            *right = parts[1];
            *bottom = parts[2];
            *left = parts[3];
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Styled tree
// ---------------------------------------------------------------------------

/// A markup node annotated with its computed style.
#[derive(Debug, Clone)]
pub enum StyledNode {
    Element {
        tag: Tag,
        style: ComputedStyle,
        children: Vec<StyledNode>,
    },
    Text {
        text: String,
        style: ComputedStyle,
    },
}

/// Build a styled tree from parsed nodes, resolving styles top-down.
/// `display:none` subtrees (including the document head) are dropped here.
pub fn build_styled_tree(nodes: &[Node], parent_style: Option<&ComputedStyle>) -> Vec<StyledNode> {
    let mut result = Vec::new();
    for node in nodes {
        match node {
            Node::Element(e) => {
                let style = resolve_style(e, parent_style);
                if style.display == Display::None {
                    continue;
                }
                let children = build_styled_tree(&e.children, Some(&style));
                result.push(StyledNode::Element {
                    tag: e.tag.clone(),
                    style,
                    children,
                });
            }
            Node::Text(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                let mut style = parent_style.cloned().unwrap_or_default();
                // Text nodes render inline: strip every box property that
                // must not leak from the containing element.
                style.background_color = Color::TRANSPARENT;
                style.border_top = Edge::NONE;
                style.border_right = Edge::NONE;
                style.border_bottom = Edge::NONE;
                style.border_left = Edge::NONE;
                style.margin_top = 0.0;
                style.margin_right = 0.0;
                style.margin_bottom = 0.0;
                style.margin_left = 0.0;
                style.padding_top = 0.0;
                style.padding_right = 0.0;
                style.padding_bottom = 0.0;
                style.padding_left = 0.0;
                result.push(StyledNode::Text {
                    text: text.clone(),
                    style,
                });
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;

    #[test]
    fn inline_typography() {
        let mut s = ComputedStyle::default();
        apply_inline_style(&mut s, "font-size:24px; color:#ff0000; font-weight:bold");
        assert_eq!(s.font_size, 24.0);
        assert!((s.color.r - 1.0).abs() < 0.01);
        assert_eq!(s.font_weight, FontWeight::Bold);
    }

    #[test]
    fn border_shorthands_hit_single_edges() {
        let mut s = ComputedStyle::default();
        apply_inline_style(&mut s, "border-left:3px solid #2563eb");
        assert!(s.border_left.is_visible());
        assert!(!s.border_top.is_visible());
        assert!((s.border_left.width - 3.0).abs() < 0.01);
    }

    #[test]
    fn rgba_colors_parse_with_alpha() {
        let c = Color::parse("rgba(255,255,255,0.15)").unwrap();
        assert!((c.a - 0.15).abs() < 0.001);
        assert!((c.r - 1.0).abs() < 0.001);
        assert_eq!(Color::parse("rgb(0, 128, 255)").map(|c| c.a), Some(1.0));
    }

    #[test]
    fn shorthand_spacing_two_values() {
        let mut s = ComputedStyle::default();
        apply_inline_style(&mut s, "padding:25px 18px");
        assert_eq!(s.padding_top, 25.0);
        assert_eq!(s.padding_left, 18.0);
    }

    #[test]
    fn head_content_is_dropped_from_styled_tree() {
        let nodes = parse("<head><title>x</title></head><div>kept</div>");
        let styled = build_styled_tree(&nodes, None);
        assert_eq!(styled.len(), 1);
    }

    #[test]
    fn text_nodes_inherit_typography_but_not_boxes() {
        let nodes =
            parse(r#"<div style="font-size:9px;background:#123456;padding:4px">hello</div>"#);
        let styled = build_styled_tree(&nodes, None);
        let StyledNode::Element { children, .. } = &styled[0] else {
            panic!("expected element");
        };
        let StyledNode::Text { style, .. } = &children[0] else {
            panic!("expected text");
        };
        assert_eq!(style.font_size, 9.0);
        assert!(style.background_color.is_transparent());
        assert_eq!(style.padding_left, 0.0);
    }
}
