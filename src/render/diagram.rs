//! Diagram overlay: hands pending diagram-source blocks to a black-box
//! layout engine, with theme re-application and a bounded retry.
//!
//! Rendered blocks carry the `mermaid-rendered` marker class so a second
//! pass over the same subtree finds nothing to do. In practice every pass
//! works on a freshly built fragment, but late timers from an abandoned
//! render must still land harmlessly.

use std::time::Duration;

use crate::dom::{DomNode, Element, Fragment};

const RENDER_ATTEMPTS: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(30);

const SOURCE_CLASS: &str = "mermaid";
const RENDERED_CLASS: &str = "mermaid-rendered";

#[derive(Debug, Clone)]
pub struct DiagramError {
    pub message: String,
}

impl DiagramError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DiagramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Diagram layout failed: {}", self.message)
    }
}

impl std::error::Error for DiagramError {}

/// Theme variables handed to the engine on every render pass. The engine
/// requires re-initialization for theme changes, so both variable sets stay
/// precomputed here.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramTheme {
    pub name: &'static str,
    pub font_size: &'static str,
    pub font_family: &'static str,
    pub primary_color: &'static str,
    pub primary_text_color: &'static str,
    pub primary_border_color: &'static str,
    pub secondary_color: &'static str,
    pub tertiary_color: &'static str,
    pub line_color: &'static str,
    pub background: &'static str,
    pub cluster_background: &'static str,
    pub cluster_border: &'static str,
    pub flowchart_curve: &'static str,
}

impl DiagramTheme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            font_size: "18px",
            font_family: "Trebuchet MS, Verdana, Arial, Sans-Serif",
            primary_color: "#2d3748",
            primary_text_color: "#e2e8f0",
            primary_border_color: "#63b3ed",
            secondary_color: "#4a5568",
            tertiary_color: "#2c5282",
            line_color: "#63b3ed",
            background: "#1e1e1e",
            cluster_background: "#2d3748",
            cluster_border: "#63b3ed",
            flowchart_curve: "linear",
        }
    }

    pub fn light() -> Self {
        Self {
            name: "default",
            font_size: "16px",
            font_family: "Trebuchet MS, Verdana, Arial, Sans-Serif",
            primary_color: "#f0f9ff",
            primary_text_color: "#1a202c",
            primary_border_color: "#3182ce",
            secondary_color: "#bee3f8",
            tertiary_color: "#90cdf4",
            line_color: "#3182ce",
            background: "#ffffff",
            cluster_background: "#edf2f7",
            cluster_border: "#3182ce",
            flowchart_curve: "basis",
        }
    }

    pub fn for_mode(is_dark: bool) -> Self {
        if is_dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Black-box diagram layout engine. One call lays out a whole batch, the way
/// the upstream renderer runs all pending nodes at once.
pub trait DiagramEngine {
    fn apply_theme(&mut self, theme: &DiagramTheme);

    fn render(
        &self,
        sources: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<DomNode>, DiagramError>> + Send;
}

/// Stand-in engine: emits an `<svg>` shell carrying the diagram source as its
/// description. Hosts plug a real layout engine in through [`DiagramEngine`].
#[derive(Debug, Default, Clone)]
pub struct PlainDiagramEngine {
    theme: Option<&'static str>,
}

impl DiagramEngine for PlainDiagramEngine {
    fn apply_theme(&mut self, theme: &DiagramTheme) {
        self.theme = Some(theme.name);
    }

    async fn render(&self, sources: &[String]) -> Result<Vec<DomNode>, DiagramError> {
        let theme = self.theme.unwrap_or("default");
        Ok(sources
            .iter()
            .map(|source| {
                let desc = Element::new("desc").with_text(source.clone());
                DomNode::Element(
                    Element::new("svg")
                        .with_attr("role", "img")
                        .with_attr("data-diagram-theme", theme)
                        .with_child(DomNode::Element(desc)),
                )
            })
            .collect())
    }
}

pub struct DiagramOverlay<E> {
    engine: E,
}

impl<E: DiagramEngine> DiagramOverlay<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Synchronous theme (re-)configuration; runs before every render pass.
    pub fn apply_theme(&mut self, is_dark: bool) {
        self.engine.apply_theme(&DiagramTheme::for_mode(is_dark));
    }

    /// Lay out every diagram-source block not yet marked rendered.
    ///
    /// Returns immediately when nothing is pending. Otherwise the batch is
    /// attempted up to two times with a short fixed backoff in between; the
    /// second failure propagates to the caller.
    pub async fn render_pending(&self, fragment: &mut Fragment) -> Result<(), DiagramError> {
        let sources = collect_pending(fragment);
        if sources.is_empty() {
            return Ok(());
        }

        let mut rendered = Vec::new();
        for attempt in 1..=RENDER_ATTEMPTS {
            match self.engine.render(&sources).await {
                Ok(nodes) => {
                    rendered = nodes;
                    break;
                }
                Err(err) if attempt == RENDER_ATTEMPTS => return Err(err),
                Err(err) => {
                    tracing::warn!(attempt, %err, "diagram render failed, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
        if rendered.len() != sources.len() {
            return Err(DiagramError::new(format!(
                "engine returned {} nodes for {} sources",
                rendered.len(),
                sources.len()
            )));
        }

        install_rendered(fragment, rendered);
        Ok(())
    }
}

fn is_pending(el: &Element) -> bool {
    el.tag == "pre" && el.has_class(SOURCE_CLASS) && !el.has_class(RENDERED_CLASS)
}

fn collect_pending(fragment: &Fragment) -> Vec<String> {
    let mut sources = Vec::new();
    fragment.for_each_element(&mut |el| {
        if is_pending(el) {
            sources.push(el.text_content());
        }
    });
    sources
}

/// Replace each pending block's content with its rendered output, in document
/// order, and mark it so later passes skip it.
fn install_rendered(fragment: &mut Fragment, rendered: Vec<DomNode>) {
    let mut queue = rendered.into_iter();
    fragment.for_each_element_mut(&mut |el| {
        if is_pending(el) {
            if let Some(node) = queue.next() {
                el.children = vec![node];
                el.add_class(RENDERED_CLASS);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyEngine {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyEngine {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DiagramEngine for FlakyEngine {
        fn apply_theme(&mut self, _theme: &DiagramTheme) {}

        async fn render(&self, sources: &[String]) -> Result<Vec<DomNode>, DiagramError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(DiagramError::new("layout blew up"));
            }
            PlainDiagramEngine::default().render(sources).await
        }
    }

    fn diagram_fragment() -> Fragment {
        let pre = Element::new("pre").with_class("mermaid").with_text("graph TD;");
        Fragment::from_nodes(vec![DomNode::Element(
            Element::new("div")
                .with_class("mermaid-container")
                .with_child(DomNode::Element(pre)),
        )])
    }

    #[tokio::test]
    async fn test_no_pending_blocks_is_a_fast_noop() {
        let overlay = DiagramOverlay::new(FlakyEngine::new(99));
        let mut frag = Fragment::new();
        overlay.render_pending(&mut frag).await.unwrap();
        assert_eq!(overlay.engine.call_count(), 0);
    }

    #[tokio::test]
    async fn test_renders_and_marks_blocks() {
        let overlay = DiagramOverlay::new(FlakyEngine::new(0));
        let mut frag = diagram_fragment();
        overlay.render_pending(&mut frag).await.unwrap();
        let html = frag.to_html();
        assert!(html.contains("mermaid-rendered"));
        assert!(html.contains("<svg role=\"img\""));
        assert!(html.contains("<desc>graph TD;</desc>"));
    }

    #[tokio::test]
    async fn test_marked_blocks_are_not_reprocessed() {
        let overlay = DiagramOverlay::new(FlakyEngine::new(0));
        let mut frag = diagram_fragment();
        overlay.render_pending(&mut frag).await.unwrap();
        assert_eq!(overlay.engine.call_count(), 1);
        overlay.render_pending(&mut frag).await.unwrap();
        assert_eq!(overlay.engine.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_failure_retries_once_then_succeeds() {
        let overlay = DiagramOverlay::new(FlakyEngine::new(1));
        let mut frag = diagram_fragment();
        overlay.render_pending(&mut frag).await.unwrap();
        assert_eq!(overlay.engine.call_count(), 2);
        assert!(frag.to_html().contains("mermaid-rendered"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_failure_propagates() {
        let overlay = DiagramOverlay::new(FlakyEngine::new(2));
        let mut frag = diagram_fragment();
        let err = overlay.render_pending(&mut frag).await.unwrap_err();
        assert_eq!(overlay.engine.call_count(), 2);
        assert!(err.message.contains("layout blew up"));
        assert!(!frag.to_html().contains("mermaid-rendered"));
    }

    #[tokio::test]
    async fn test_theme_reaches_engine() {
        let mut overlay = DiagramOverlay::new(PlainDiagramEngine::default());
        overlay.apply_theme(true);
        let mut frag = diagram_fragment();
        overlay.render_pending(&mut frag).await.unwrap();
        assert!(frag.to_html().contains("data-diagram-theme=\"dark\""));
    }
}
