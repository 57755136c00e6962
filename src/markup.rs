//! Markup parser – converts a rendered document string into a node tree.
//!
//! The renderers emit a controlled subset of HTML:
//! - Structural: div, p, h1-h3, ul, li, table, tr, td, th
//! - Inline: span
//! - Document shell: html, head, meta, title, body
//! - Styling exclusively via the `style` attribute
//!
//! A hand-written recursive-descent parser covers this subset of markup
//! the crate itself generates.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Node types
// ---------------------------------------------------------------------------

/// The tag name of a supported element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    P,
    H1,
    H2,
    H3,
    Ul,
    Li,
    Table,
    Tr,
    Td,
    Th,
    Span,
    Html,
    Head,
    Body,
    Title,
    Meta,
    /// Unrecognised tags are kept in the tree but resolve to display:none.
    Unknown(String),
}

impl Tag {
    pub fn from_name(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "div" => Tag::Div,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "ul" => Tag::Ul,
            "li" => Tag::Li,
            "table" => Tag::Table,
            "tr" => Tag::Tr,
            "td" => Tag::Td,
            "th" => Tag::Th,
            "span" => Tag::Span,
            "html" => Tag::Html,
            "head" => Tag::Head,
            "body" => Tag::Body,
            "title" => Tag::Title,
            "meta" => Tag::Meta,
            _ => Tag::Unknown(s.to_string()),
        }
    }

    /// Void elements carry no children and need no closing tag.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Meta)
    }
}

/// A node in the parsed tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element carrying tag, attributes, and children.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attributes.get("style").map(|s| s.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a markup string into a list of nodes.
pub fn parse(input: &str) -> Vec<Node> {
    let mut parser = Parser::new(input);
    parser.parse_nodes()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse_nodes(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            self.skip_inter_element_whitespace();
            if self.eof() || self.starts_with("</") {
                break;
            }
            if let Some(node) = self.parse_node() {
                nodes.push(node);
            }
        }
        nodes
    }

    fn parse_node(&mut self) -> Option<Node> {
        if self.starts_with("<!--") {
            self.skip_comment();
            return None;
        }
        if self.starts_with("<!") || self.starts_with("<?") {
            // Doctype / processing instruction
            while !self.eof() && !self.starts_with(">") {
                self.advance(1);
            }
            if !self.eof() {
                self.advance(1);
            }
            return None;
        }
        if self.starts_with("<") {
            Some(self.parse_element())
        } else {
            Some(self.parse_text())
        }
    }

    fn parse_text(&mut self) -> Node {
        let start = self.pos;
        while !self.eof() && !self.starts_with("<") {
            self.advance(1);
        }
        Node::Text(decode_entities(&self.input[start..self.pos]))
    }

    fn parse_element(&mut self) -> Node {
        self.advance(1); // '<'
        let tag_name = self.parse_name();
        let tag = Tag::from_name(&tag_name);
        let mut elem = Element::new(tag.clone());

        loop {
            self.skip_whitespace();
            if self.eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            let (key, value) = self.parse_attribute();
            elem.attributes.insert(key, value);
        }

        if self.starts_with("/>") {
            self.advance(2);
            return Node::Element(elem);
        }
        if self.starts_with(">") {
            self.advance(1);
        }
        if tag.is_void() {
            return Node::Element(elem);
        }

        elem.children = self.parse_nodes();

        // Closing tag
        if self.starts_with("</") {
            self.advance(2);
            self.parse_name();
            self.skip_whitespace();
            if self.starts_with(">") {
                self.advance(1);
            }
        }

        Node::Element(elem)
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_attribute(&mut self) -> (String, String) {
        let key = self.parse_name();
        self.skip_whitespace();
        if !self.starts_with("=") {
            return (key, String::new());
        }
        self.advance(1);
        self.skip_whitespace();
        (key, self.parse_attr_value())
    }

    fn parse_attr_value(&mut self) -> String {
        for quote in ['"', '\''] {
            if self.current_char_is(quote) {
                self.advance(1);
                let start = self.pos;
                while !self.eof() && !self.current_char_is(quote) {
                    self.advance(1);
                }
                let val = self.input[start..self.pos].to_string();
                if !self.eof() {
                    self.advance(1);
                }
                return decode_entities(&val);
            }
        }
        // Unquoted value
        let start = self.pos;
        while !self.eof() {
            let c = self.current_char();
            if c.is_whitespace() || c == '>' || c == '/' {
                break;
            }
            self.advance(1);
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
    }

    /// Skip runs of pure whitespace between elements, but leave mixed
    /// text/element content intact so inline text keeps its spacing.
    fn skip_inter_element_whitespace(&mut self) {
        let saved = self.pos;
        while !self.eof() && self.current_char().is_whitespace() {
            self.advance(1);
        }
        if !self.eof() && !self.starts_with("<") {
            self.pos = saved;
        }
    }

    fn skip_comment(&mut self) {
        self.advance(4); // "<!--"
        while !self.eof() && !self.starts_with("-->") {
            self.advance(1);
        }
        if !self.eof() {
            self.advance(3);
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap()
    }

    fn current_char_is(&self, c: char) -> bool {
        !self.eof() && self.current_char() == c
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if let Some(c) = self.input[self.pos..].chars().next() {
                self.pos += c.len_utf8();
            }
        }
    }
}

/// Decode the named entities the renderers emit plus numeric character
/// references (`&#8226;` and friends).
fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        let decoded: Option<char> = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| {
                    if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        num.parse::<u32>().ok()
                    }
                })
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Convenience helpers
// ---------------------------------------------------------------------------

/// Find the `<body>` element and return its children, or all nodes when no
/// document shell is present (fragments are fine).
pub fn body_children(nodes: &[Node]) -> Vec<Node> {
    for node in nodes {
        if let Node::Element(e) = node {
            if e.tag == Tag::Body {
                return e.children.clone();
            }
            if e.tag == Tag::Html {
                let inner = body_children(&e.children);
                if !inner.is_empty() {
                    return inner;
                }
            }
        }
    }
    nodes.to_vec()
}

/// The `<body>` element itself (for its inline style), if present.
pub fn body_element(nodes: &[Node]) -> Option<&Element> {
    for node in nodes {
        if let Node::Element(e) = node {
            if e.tag == Tag::Body {
                return Some(e);
            }
            if e.tag == Tag::Html {
                if let Some(found) = body_element(&e.children) {
                    return Some(found);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_styled_div() {
        let nodes = parse(r#"<div style="padding:4px"><p>Hello</p></div>"#);
        assert_eq!(nodes.len(), 1);
        let Node::Element(e) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(e.tag, Tag::Div);
        assert_eq!(e.inline_style(), Some("padding:4px"));
        assert_eq!(e.children.len(), 1);
    }

    #[test]
    fn parse_document_shell() {
        let nodes = parse(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/><title>T</title></head>\
             <body><div>content</div></body></html>",
        );
        let body = body_children(&nodes);
        assert_eq!(body.len(), 1);
        let Node::Element(e) = &body[0] else {
            panic!("expected element");
        };
        assert_eq!(e.tag, Tag::Div);
    }

    #[test]
    fn parse_table_rows() {
        let nodes = parse("<table><tr><td>A</td><td>B</td></tr></table>");
        let Node::Element(table) = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(table.tag, Tag::Table);
        assert_eq!(table.children.len(), 1);
        let Node::Element(tr) = &table.children[0] else {
            panic!("expected tr");
        };
        assert_eq!(tr.children.len(), 2);
    }

    #[test]
    fn decode_named_and_numeric_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#8226; item"), "\u{2022} item");
        assert_eq!(decode_entities("&#x2022;"), "\u{2022}");
        assert_eq!(decode_entities("broken &#; stays"), "broken &#; stays");
        assert_eq!(decode_entities("lone & ampersand"), "lone & ampersand");
    }

    #[test]
    fn nested_spans_keep_text_order() {
        let nodes = parse("<p>Hello <span>world</span>!</p>");
        let Node::Element(p) = &nodes[0] else {
            panic!("expected p");
        };
        assert_eq!(p.children.len(), 3);
    }

    #[test]
    fn unknown_tags_are_kept() {
        let nodes = parse("<article><p>x</p></article>");
        let Node::Element(e) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(e.tag, Tag::Unknown("article".to_string()));
    }
}
