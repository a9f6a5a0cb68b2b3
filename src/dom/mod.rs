//! Lightweight DOM tree used as the render target.
//!
//! Rendering never patches incrementally: each pass produces a fresh
//! [`Fragment`] whose ownership moves into the viewport wholesale. Text is
//! stored raw and HTML-escaped exactly once, at serialization time; `Raw`
//! nodes are the only unescaped output path.

mod viewport;

pub use viewport::{ElementBox, ScrollAlign, ScrollBehavior, Viewport};

/// A node in a rendered fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum DomNode {
    Element(Element),
    Text(String),
    /// Raw HTML passed through verbatim (authored HTML blocks).
    Raw(String),
}

impl DomNode {
    pub fn text(text: impl Into<String>) -> Self {
        DomNode::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DomNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            DomNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element node: tag, attributes in insertion order, children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<DomNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(DomNode::Text(text.into()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|list| list.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        match self.attr("class") {
            Some(existing) if !existing.is_empty() => {
                let joined = format!("{} {}", existing, class);
                self.set_attr("class", joined);
            }
            _ => self.set_attr("class", class),
        }
    }

    pub fn push(&mut self, child: DomNode) {
        self.children.push(child);
    }

    /// Concatenated text content of the subtree (Raw nodes excluded).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(t) => out.push_str(t),
            DomNode::Element(el) => collect_text(&el.children, out),
            DomNode::Raw(_) => {}
        }
    }
}

/// An ordered sequence of sibling nodes; the unit a render pass produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub nodes: Vec<DomNode>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<DomNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: DomNode) {
        self.nodes.push(node);
    }

    /// Pre-order walk over every element in the fragment.
    pub fn for_each_element(&self, f: &mut impl FnMut(&Element)) {
        fn walk(nodes: &[DomNode], f: &mut impl FnMut(&Element)) {
            for node in nodes {
                if let DomNode::Element(el) = node {
                    f(el);
                    walk(&el.children, f);
                }
            }
        }
        walk(&self.nodes, f);
    }

    /// Pre-order mutable walk. Children are visited after the callback ran on
    /// the parent, so replacements installed by the callback are not revisited
    /// as siblings but are descended into.
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        fn walk(nodes: &mut [DomNode], f: &mut impl FnMut(&mut Element)) {
            for node in nodes {
                if let DomNode::Element(el) = node {
                    f(el);
                    walk(&mut el.children, f);
                }
            }
        }
        walk(&mut self.nodes, f);
    }

    /// Recursively rewrite every text node in place.
    pub fn visit_text_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        fn walk(nodes: &mut [DomNode], f: &mut impl FnMut(&mut String)) {
            for node in nodes {
                match node {
                    DomNode::Text(t) => f(t),
                    DomNode::Element(el) => walk(&mut el.children, f),
                    DomNode::Raw(_) => {}
                }
            }
        }
        walk(&mut self.nodes, f);
    }

    pub fn find_element(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        fn walk<'a>(
            nodes: &'a [DomNode],
            pred: &impl Fn(&Element) -> bool,
        ) -> Option<&'a Element> {
            for node in nodes {
                if let DomNode::Element(el) = node {
                    if pred(el) {
                        return Some(el);
                    }
                    if let Some(found) = walk(&el.children, pred) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.nodes, pred)
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.find_element(&|el| el.attr("id") == Some(id))
    }

    /// Replace non-breaking spaces in every text node with ordinary spaces.
    pub fn sanitize_text(&mut self) {
        self.visit_text_mut(&mut |text| {
            if text.contains('\u{a0}') {
                *text = text.replace('\u{a0}', " ");
            }
        });
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, &mut out);
        out
    }
}

fn is_void_tag(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img")
}

fn write_nodes(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(t) => escape_text(t, out),
            DomNode::Raw(raw) => out.push_str(raw),
            DomNode::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&el.tag) {
                    continue;
                }
                write_nodes(&el.children, out);
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

pub(crate) fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

pub(crate) fn escape_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
