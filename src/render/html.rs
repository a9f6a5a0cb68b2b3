//! Token renderer: [`DocumentToken`] tree → DOM fragment.
//!
//! Pure and deterministic; no I/O, no state. Dispatch is a single match over
//! the closed token set. Unrecognized content renders nothing by policy.

use crate::dom::{DomNode, Element, Fragment};
use crate::models::{ColumnAlign, DocumentToken, TableCell};

pub fn render_tokens(tokens: &[DocumentToken]) -> Fragment {
    Fragment::from_nodes(render_nodes(tokens))
}

fn render_nodes(tokens: &[DocumentToken]) -> Vec<DomNode> {
    tokens.iter().filter_map(render_token).collect()
}

fn render_token(token: &DocumentToken) -> Option<DomNode> {
    let node = match token {
        DocumentToken::Paragraph { children } => {
            element_with("p", render_nodes(children))
        }
        DocumentToken::Heading { depth, children } => {
            let depth = (*depth).clamp(1, 6);
            let mut el = Element::new(format!("h{}", depth));
            let slug = slugify(&plain_text(children));
            if !slug.is_empty() {
                el.set_attr("id", slug);
            }
            el.children = render_nodes(children);
            DomNode::Element(el)
        }
        DocumentToken::List {
            ordered,
            start,
            items,
        } => {
            let mut list = Element::new(if *ordered { "ol" } else { "ul" });
            if *ordered && *start != 1 {
                list.set_attr("start", start.to_string());
            }
            for item in items {
                let mut li = Element::new("li");
                li.children = render_nodes(item);
                list.push(DomNode::Element(li));
            }
            DomNode::Element(list)
        }
        DocumentToken::Blockquote { children } => {
            element_with("blockquote", render_nodes(children))
        }
        DocumentToken::HorizontalRule => DomNode::Element(Element::new("hr")),
        DocumentToken::Space => DomNode::Text(" ".into()),
        DocumentToken::Text(text) => DomNode::Text(text.clone()),
        DocumentToken::Emphasis { children } => element_with("em", render_nodes(children)),
        DocumentToken::Strong { children } => element_with("strong", render_nodes(children)),
        DocumentToken::Strikethrough { children } => element_with("del", render_nodes(children)),
        DocumentToken::CodeSpan(code) => {
            DomNode::Element(Element::new("code").with_text(code.clone()))
        }
        DocumentToken::LineBreak => DomNode::Element(Element::new("br")),
        DocumentToken::Link {
            href,
            title,
            children,
        } => {
            let mut a = Element::new("a").with_attr("href", clean_url(href));
            if let Some(title) = title {
                a.set_attr("title", title.clone());
            }
            a.children = render_nodes(children);
            DomNode::Element(a)
        }
        DocumentToken::Image { href, title, alt } => {
            let mut img = Element::new("img")
                .with_attr("src", clean_url(href))
                .with_attr("alt", alt.clone());
            if let Some(title) = title {
                img.set_attr("title", title.clone());
            }
            DomNode::Element(img)
        }
        DocumentToken::Code { language, text } => render_code(language.as_deref(), text),
        DocumentToken::Table {
            header,
            rows,
            aligns,
        } => render_table(header, rows, aligns),
        DocumentToken::Html(raw) => {
            if raw.trim_start().starts_with("<!--") {
                return None;
            }
            DomNode::Raw(raw.clone())
        }
    };
    Some(node)
}

/// Three output shapes by language tag: diagram source and folder pseudo-trees
/// get a labeled container around a `<pre class="{tag}">`; everything else is
/// an ordinary highlighted-ready `<pre><code>` pair.
fn render_code(language: Option<&str>, text: &str) -> DomNode {
    let language = language.unwrap_or("plaintext");

    if language == "mermaid" {
        let pre = Element::new("pre").with_class("mermaid").with_text(text);
        return DomNode::Element(
            Element::new("div")
                .with_class("mermaid-container")
                .with_child(DomNode::Element(pre)),
        );
    }

    if language == "folder" {
        let code = Element::new("code").with_text(text);
        let pre = Element::new("pre")
            .with_class("folder")
            .with_child(DomNode::Element(code));
        return DomNode::Element(
            Element::new("div")
                .with_class("folder-container")
                .with_child(DomNode::Element(pre)),
        );
    }

    let code = Element::new("code")
        .with_class(&format!("language-{}", language))
        .with_text(text);
    DomNode::Element(Element::new("pre").with_child(DomNode::Element(code)))
}

fn render_table(header: &[TableCell], rows: &[Vec<TableCell>], aligns: &[ColumnAlign]) -> DomNode {
    let mut table = Element::new("table").with_class("md-table");

    let mut head_row = Element::new("tr");
    for (col, cell) in header.iter().enumerate() {
        head_row.push(render_cell(cell, aligns.get(col).copied(), true));
    }
    let thead = Element::new("thead").with_child(DomNode::Element(head_row));
    table.push(DomNode::Element(thead));

    // A header-only table is still a valid table; it just skips tbody (and
    // the scroll container).
    if rows.is_empty() {
        return DomNode::Element(table);
    }

    let mut tbody = Element::new("tbody");
    for row in rows {
        let mut tr = Element::new("tr");
        for (col, cell) in row.iter().enumerate() {
            tr.push(render_cell(cell, aligns.get(col).copied(), false));
        }
        tbody.push(DomNode::Element(tr));
    }
    table.push(DomNode::Element(tbody));

    DomNode::Element(
        Element::new("div")
            .with_class("md-table-container")
            .with_child(DomNode::Element(table)),
    )
}

fn render_cell(cell: &TableCell, align: Option<ColumnAlign>, header: bool) -> DomNode {
    let mut el = Element::new(if header { "th" } else { "td" });
    if let Some(attr) = align.and_then(ColumnAlign::as_attr) {
        el.set_attr("align", attr);
    }
    el.children = render_nodes(&cell.children);
    DomNode::Element(el)
}

fn element_with(tag: &str, children: Vec<DomNode>) -> DomNode {
    let mut el = Element::new(tag);
    el.children = children;
    DomNode::Element(el)
}

fn plain_text(tokens: &[DocumentToken]) -> String {
    fn walk(tokens: &[DocumentToken], out: &mut String) {
        for token in tokens {
            match token {
                DocumentToken::Text(t) | DocumentToken::CodeSpan(t) => out.push_str(t),
                DocumentToken::Emphasis { children }
                | DocumentToken::Strong { children }
                | DocumentToken::Strikethrough { children }
                | DocumentToken::Link { children, .. } => walk(children, out),
                _ => {}
            }
        }
    }
    let mut out = String::new();
    walk(tokens, &mut out);
    out
}

/// Slug for heading anchors: lowercased, spaces to hyphens, anything outside
/// `[a-z0-9_-]` removed, runs of hyphens collapsed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_whitespace() || ch == '-' {
            if !last_hyphen && !slug.is_empty() {
                slug.push('-');
                last_hyphen = true;
            }
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
            last_hyphen = false;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Percent-normalize an href the way `encodeURI` would: escape what cannot
/// appear raw, leave the URI structure and existing `%XX` escapes alone.
pub fn clean_url(href: &str) -> String {
    const KEEP: &[u8] = b"-_.!~*'();/?:@&=+$,#%[]";
    let mut out = String::with_capacity(href.len());
    for &byte in href.as_bytes() {
        if byte.is_ascii_alphanumeric() || KEEP.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&format!("{:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/html.rs"]
mod tests;
