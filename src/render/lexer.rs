//! Adapter from `pulldown-cmark` events to the [`DocumentToken`] tree.
//!
//! Parsing proper is the library's job; this module only rebuilds the event
//! stream into the owned token tree the renderer dispatches over. HTML
//! comments are dropped here so authoring notes never reach the DOM.

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::models::{ColumnAlign, DocumentToken, TableCell};

pub fn lex(markdown: &str) -> Vec<DocumentToken> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options);
    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.event(event);
    }
    builder.finish()
}

enum Frame {
    Container {
        kind: ContainerKind,
        children: Vec<DocumentToken>,
    },
    List {
        ordered: bool,
        start: u64,
        items: Vec<Vec<DocumentToken>>,
    },
    Item {
        children: Vec<DocumentToken>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    Table {
        aligns: Vec<ColumnAlign>,
        header: Vec<TableCell>,
        rows: Vec<Vec<TableCell>>,
        row: Vec<TableCell>,
        in_head: bool,
    },
    Cell {
        children: Vec<DocumentToken>,
    },
    Image {
        href: String,
        title: Option<String>,
        alt: String,
    },
    HtmlBlock {
        raw: String,
    },
}

enum ContainerKind {
    Paragraph,
    Heading(u8),
    Blockquote,
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: Option<String> },
}

struct TreeBuilder {
    stack: Vec<Frame>,
    out: Vec<DocumentToken>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            out: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<DocumentToken> {
        // A well-formed event stream leaves the stack empty; anything still
        // open is closed in order so no content is lost.
        while let Some(frame) = self.stack.pop() {
            if let Some(token) = close_frame(frame, &mut self.stack) {
                self.push(token);
            }
        }
        self.out
    }

    fn push(&mut self, token: DocumentToken) {
        match self.stack.last_mut() {
            Some(Frame::Container { children, .. })
            | Some(Frame::Item { children })
            | Some(Frame::Cell { children }) => children.push(token),
            Some(Frame::Image { alt, .. }) => {
                // An image's children only contribute to its alt text.
                collect_plain_text(&token, alt);
            }
            Some(Frame::Code { text, .. }) => {
                if let DocumentToken::Text(t) = token {
                    text.push_str(&t);
                }
            }
            Some(Frame::List { .. }) | Some(Frame::Table { .. }) => {
                // Only item/cell frames may produce content here; stray
                // tokens between rows or items are dropped.
            }
            Some(Frame::HtmlBlock { .. }) | None => self.out.push(token),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame::Code { text: buf, .. }) => buf.push_str(&text),
                Some(Frame::HtmlBlock { raw }) => raw.push_str(&text),
                Some(Frame::Image { alt, .. }) => alt.push_str(&text),
                _ => self.push(DocumentToken::Text(text.into_string())),
            },
            Event::Code(code) => self.push(DocumentToken::CodeSpan(code.into_string())),
            Event::SoftBreak => self.push(DocumentToken::Text(" ".into())),
            Event::HardBreak => self.push(DocumentToken::LineBreak),
            Event::Rule => self.push(DocumentToken::HorizontalRule),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::HtmlBlock { raw }) => raw.push_str(&html),
                _ => self.push_html(html.into_string()),
            },
            Event::InlineHtml(html) => self.push_html(html.into_string()),
            // Footnotes, task markers and math events are not part of the
            // documented token set: skipped by policy, not an error.
            _ => {}
        }
    }

    fn push_html(&mut self, raw: String) {
        if is_html_comment(&raw) {
            return;
        }
        self.push(DocumentToken::Html(raw));
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => container(ContainerKind::Paragraph),
            Tag::Heading { level, .. } => container(ContainerKind::Heading(heading_depth(level))),
            Tag::BlockQuote(_) => container(ContainerKind::Blockquote),
            Tag::Emphasis => container(ContainerKind::Emphasis),
            Tag::Strong => container(ContainerKind::Strong),
            Tag::Strikethrough => container(ContainerKind::Strikethrough),
            Tag::Link { dest_url, title, .. } => container(ContainerKind::Link {
                href: dest_url.into_string(),
                title: non_empty(title.into_string()),
            }),
            Tag::Image { dest_url, title, .. } => Frame::Image {
                href: dest_url.into_string(),
                title: non_empty(title.into_string()),
                alt: String::new(),
            },
            Tag::CodeBlock(kind) => Frame::Code {
                language: match kind {
                    CodeBlockKind::Fenced(lang) => {
                        non_empty(lang.split_whitespace().next().unwrap_or("").to_string())
                    }
                    CodeBlockKind::Indented => None,
                },
                text: String::new(),
            },
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                items: Vec::new(),
            },
            Tag::Item => Frame::Item {
                children: Vec::new(),
            },
            Tag::Table(aligns) => Frame::Table {
                aligns: aligns.iter().map(|a| column_align(*a)).collect(),
                header: Vec::new(),
                rows: Vec::new(),
                row: Vec::new(),
                in_head: false,
            },
            Tag::TableHead => {
                if let Some(Frame::Table { in_head, .. }) = self.stack.last_mut() {
                    *in_head = true;
                }
                return;
            }
            Tag::TableRow => return,
            Tag::TableCell => Frame::Cell {
                children: Vec::new(),
            },
            Tag::HtmlBlock => Frame::HtmlBlock { raw: String::new() },
            // Footnote definitions, metadata blocks: outside the token set.
            _ => return,
        };
        self.stack.push(frame);
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::TableHead => {
                if let Some(Frame::Table { in_head, header, row, .. }) = self.stack.last_mut() {
                    *in_head = false;
                    *header = std::mem::take(row);
                }
                return;
            }
            TagEnd::TableRow => {
                if let Some(Frame::Table { rows, row, .. }) = self.stack.last_mut() {
                    rows.push(std::mem::take(row));
                }
                return;
            }
            TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => return,
            _ => {}
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let Some(token) = close_frame(frame, &mut self.stack) {
            self.push(token);
        }
    }
}

fn container(kind: ContainerKind) -> Frame {
    Frame::Container {
        kind,
        children: Vec::new(),
    }
}

/// Turn a finished frame into a token, or feed it into its parent frame for
/// the frames (items, cells, html blocks) that do not map to a token 1:1.
fn close_frame(frame: Frame, stack: &mut Vec<Frame>) -> Option<DocumentToken> {
    match frame {
        Frame::Container { kind, children } => Some(match kind {
            ContainerKind::Paragraph => DocumentToken::Paragraph { children },
            ContainerKind::Heading(depth) => DocumentToken::Heading { depth, children },
            ContainerKind::Blockquote => DocumentToken::Blockquote { children },
            ContainerKind::Emphasis => DocumentToken::Emphasis { children },
            ContainerKind::Strong => DocumentToken::Strong { children },
            ContainerKind::Strikethrough => DocumentToken::Strikethrough { children },
            ContainerKind::Link { href, title } => DocumentToken::Link {
                href,
                title,
                children,
            },
        }),
        Frame::List {
            ordered,
            start,
            items,
        } => Some(DocumentToken::List {
            ordered,
            start,
            items,
        }),
        Frame::Item { children } => {
            if let Some(Frame::List { items, .. }) = stack.last_mut() {
                items.push(children);
            }
            None
        }
        Frame::Code { language, text } => Some(DocumentToken::Code { language, text }),
        Frame::Table {
            aligns,
            header,
            rows,
            ..
        } => Some(DocumentToken::Table {
            header,
            rows,
            aligns,
        }),
        Frame::Cell { children } => {
            if let Some(Frame::Table { row, .. }) = stack.last_mut() {
                row.push(TableCell { children });
            }
            None
        }
        Frame::Image { href, title, alt } => Some(DocumentToken::Image { href, title, alt }),
        Frame::HtmlBlock { raw } => {
            if is_html_comment(&raw) {
                None
            } else if raw.trim().is_empty() {
                None
            } else {
                Some(DocumentToken::Html(raw))
            }
        }
    }
}

fn collect_plain_text(token: &DocumentToken, out: &mut String) {
    match token {
        DocumentToken::Text(t) | DocumentToken::CodeSpan(t) => out.push_str(t),
        DocumentToken::Emphasis { children }
        | DocumentToken::Strong { children }
        | DocumentToken::Strikethrough { children }
        | DocumentToken::Paragraph { children }
        | DocumentToken::Link { children, .. } => {
            for child in children {
                collect_plain_text(child, out);
            }
        }
        _ => {}
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn column_align(align: Alignment) -> ColumnAlign {
    match align {
        Alignment::None => ColumnAlign::None,
        Alignment::Left => ColumnAlign::Left,
        Alignment::Center => ColumnAlign::Center,
        Alignment::Right => ColumnAlign::Right,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn is_html_comment(raw: &str) -> bool {
    raw.trim_start().starts_with("<!--")
}
