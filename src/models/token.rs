//! Parsed-Markdown token tree.
//!
//! Produced by the lexer adapter (parsing itself is delegated to
//! `pulldown-cmark`), consumed by the token renderer. Container variants own
//! their children; the tree is acyclic and never mutated after lexing.

/// A node in the parsed document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentToken {
    Paragraph {
        children: Vec<DocumentToken>,
    },
    Heading {
        /// 1..=6
        depth: u8,
        children: Vec<DocumentToken>,
    },
    List {
        ordered: bool,
        /// First item number of an ordered list; 1 for unordered lists.
        start: u64,
        items: Vec<Vec<DocumentToken>>,
    },
    Blockquote {
        children: Vec<DocumentToken>,
    },
    HorizontalRule,
    Space,
    Text(String),
    Emphasis {
        children: Vec<DocumentToken>,
    },
    Strong {
        children: Vec<DocumentToken>,
    },
    Strikethrough {
        children: Vec<DocumentToken>,
    },
    CodeSpan(String),
    LineBreak,
    Link {
        href: String,
        title: Option<String>,
        children: Vec<DocumentToken>,
    },
    Image {
        href: String,
        title: Option<String>,
        alt: String,
    },
    Code {
        /// Fence language tag; `None` renders as plaintext.
        language: Option<String>,
        text: String,
    },
    Table {
        header: Vec<TableCell>,
        rows: Vec<Vec<TableCell>>,
        aligns: Vec<ColumnAlign>,
    },
    /// Raw authored HTML. Comments are dropped before this variant is built.
    Html(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub children: Vec<DocumentToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlign {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl ColumnAlign {
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            ColumnAlign::None => None,
            ColumnAlign::Left => Some("left"),
            ColumnAlign::Center => Some("center"),
            ColumnAlign::Right => Some("right"),
        }
    }
}
