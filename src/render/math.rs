//! Math overlay: finds delimiter-bounded math in rendered text nodes and
//! swaps in typeset output from a black-box engine.
//!
//! Runs once per render pass over a freshly rendered fragment; re-invoking on
//! the same fragment is harmless because typeset output is skipped, but it
//! must never run on raw Markdown (the delimiters would not yet be confined
//! to text nodes).

use memchr::memmem;

use crate::dom::{DomNode, Element, Fragment};

/// A malformed math expression.
#[derive(Debug, Clone)]
pub struct MathError {
    pub source: String,
    pub message: String,
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Math typeset failed for `{}`: {}", self.source, self.message)
    }
}

impl std::error::Error for MathError {}

/// Black-box typesetter. `display` distinguishes block from inline layout.
pub trait MathEngine {
    fn typeset(&self, source: &str, display: bool) -> Result<DomNode, MathError>;
}

/// Stand-in engine: wraps the source in a classed span without real layout.
/// Hosts plug a real typesetter in through [`MathEngine`].
#[derive(Debug, Default, Clone)]
pub struct PlainMathEngine;

impl MathEngine for PlainMathEngine {
    fn typeset(&self, source: &str, display: bool) -> Result<DomNode, MathError> {
        let class = if display { "math math-display" } else { "math math-inline" };
        Ok(DomNode::Element(
            Element::new("span").with_class(class).with_text(source),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct MathConfig {
    /// Propagate the first malformed expression instead of flagging it
    /// in place.
    pub strict: bool,
    /// Color applied to in-place failure marks.
    pub error_color: String,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            strict: false,
            error_color: "#ff0000".into(),
        }
    }
}

struct Delimiter {
    left: &'static str,
    right: &'static str,
    display: bool,
    /// Environments pass the whole match to the engine, delimiters included.
    keep_delims: bool,
}

// Order matters: `$$` must win over `$` at the same offset.
const DELIMITERS: &[Delimiter] = &[
    Delimiter { left: "$$", right: "$$", display: true, keep_delims: false },
    Delimiter { left: "\\[", right: "\\]", display: true, keep_delims: false },
    Delimiter { left: "\\(", right: "\\)", display: false, keep_delims: false },
    Delimiter {
        left: "\\begin{equation}",
        right: "\\end{equation}",
        display: true,
        keep_delims: true,
    },
    Delimiter {
        left: "\\begin{align}",
        right: "\\end{align}",
        display: true,
        keep_delims: true,
    },
    Delimiter {
        left: "\\begin{alignat}",
        right: "\\end{alignat}",
        display: true,
        keep_delims: true,
    },
    Delimiter {
        left: "\\begin{gather}",
        right: "\\end{gather}",
        display: true,
        keep_delims: true,
    },
    Delimiter { left: "\\begin{CD}", right: "\\end{CD}", display: true, keep_delims: true },
    Delimiter { left: "$", right: "$", display: false, keep_delims: false },
];

// Text inside these is authored literally and never typeset.
const IGNORED_TAGS: &[&str] = &["pre", "code", "script", "style", "textarea"];

enum Segment {
    Text(String),
    Math { source: String, display: bool },
}

pub struct MathOverlay<E> {
    engine: E,
    config: MathConfig,
    error_hook: Option<Box<dyn FnMut(&MathError) + Send>>,
}

impl<E: MathEngine> MathOverlay<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: MathConfig::default(),
            error_hook: None,
        }
    }

    pub fn with_config(mut self, config: MathConfig) -> Self {
        self.config = config;
        self
    }

    /// Callback invoked for every malformed expression, in both policies.
    pub fn on_error(mut self, hook: impl FnMut(&MathError) + Send + 'static) -> Self {
        self.error_hook = Some(Box::new(hook));
        self
    }

    /// Scan the fragment and replace delimiter-bounded math spans in place.
    ///
    /// Returns `Err` only in strict mode; otherwise failures are reported and
    /// marked without aborting the rest of the container.
    pub fn typeset(&mut self, fragment: &mut Fragment) -> Result<(), MathError> {
        let mut nodes = std::mem::take(&mut fragment.nodes);
        let result = self.process_nodes(&mut nodes);
        fragment.nodes = nodes;
        result
    }

    fn process_nodes(&mut self, nodes: &mut Vec<DomNode>) -> Result<(), MathError> {
        let mut rebuilt = Vec::with_capacity(nodes.len());
        for mut node in nodes.drain(..) {
            match &mut node {
                DomNode::Element(el) => {
                    if !ignored(el) {
                        self.process_nodes(&mut el.children)?;
                    }
                    rebuilt.push(node);
                }
                DomNode::Text(text) => match scan(text) {
                    None => rebuilt.push(node),
                    Some(segments) => {
                        for segment in segments {
                            match segment {
                                Segment::Text(t) => rebuilt.push(DomNode::Text(t)),
                                Segment::Math { source, display } => {
                                    rebuilt.push(self.typeset_one(&source, display)?);
                                }
                            }
                        }
                    }
                },
                DomNode::Raw(_) => rebuilt.push(node),
            }
        }
        *nodes = rebuilt;
        Ok(())
    }

    fn typeset_one(&mut self, source: &str, display: bool) -> Result<DomNode, MathError> {
        match self.engine.typeset(source, display) {
            Ok(node) => Ok(node),
            Err(err) => {
                tracing::error!(source = %err.source, message = %err.message, "math typeset failed");
                if let Some(hook) = &mut self.error_hook {
                    hook(&err);
                }
                if self.config.strict {
                    return Err(err);
                }
                let span = Element::new("span")
                    .with_class("math-error")
                    .with_attr("style", format!("color:{}", self.config.error_color))
                    .with_text(source);
                Ok(DomNode::Element(span))
            }
        }
    }
}

fn ignored(el: &Element) -> bool {
    IGNORED_TAGS.contains(&el.tag.as_str())
        || el.has_class("math")
        || el.has_class("math-error")
}

/// Split a text run into plain and math segments; `None` when no complete
/// delimiter pair is present.
fn scan(text: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = text;
    let mut found_math = false;

    'outer: while !rest.is_empty() {
        // Earliest match wins; on a tie the earlier table entry does, so `$$`
        // beats `$` at the same offset.
        let mut hit: Option<(usize, &Delimiter)> = None;
        for delim in DELIMITERS {
            if let Some(i) = memmem::find(rest.as_bytes(), delim.left.as_bytes()) {
                if hit.map_or(true, |(best, _)| i < best) {
                    hit = Some((i, delim));
                }
            }
        }
        let Some((start, delim)) = hit else {
            break;
        };

        let after = &rest[start + delim.left.len()..];
        let Some(end) = memmem::find(after.as_bytes(), delim.right.as_bytes()) else {
            // Unbalanced opener stays literal text.
            break;
        };
        let content = &after[..end];
        if content.is_empty() {
            // `$$` as literal currency etc. — skip past the opener.
            let literal_end = start + delim.left.len();
            segments.push(Segment::Text(rest[..literal_end].to_string()));
            rest = &rest[literal_end..];
            continue 'outer;
        }

        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }
        let source = if delim.keep_delims {
            format!("{}{}{}", delim.left, content, delim.right)
        } else {
            content.to_string()
        };
        segments.push(Segment::Math {
            source,
            display: delim.display,
        });
        found_math = true;
        rest = &after[end + delim.right.len()..];
    }

    if !found_math {
        return None;
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Some(segments)
}
