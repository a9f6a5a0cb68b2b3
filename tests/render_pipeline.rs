//! End-to-end render pipeline tests: Markdown in, enhanced DOM out.

use docpane::dom::Viewport;
use docpane::models::FileType;
use docpane::render::{
    DiagramOverlay, MathOverlay, PlainDiagramEngine, PlainMathEngine, RenderPipeline,
    RenderRequest,
};

fn pipeline() -> RenderPipeline<PlainMathEngine, PlainDiagramEngine> {
    RenderPipeline::new(
        MathOverlay::new(PlainMathEngine),
        DiagramOverlay::new(PlainDiagramEngine::default()),
    )
}

const DOC: &str = "\
# User Guide

Euler: $e^{i\\pi} + 1 = 0$ and a block:

$$\\int_0^1 x\\,dx$$

```mermaid
graph TD;
  A-->B;
```

```folder
src/
  lib.rs
```

| Feature | Status |
|:--------|-------:|
| math    | done   |

See [setup](#inlineId:setup) or [the API doc](#docId:api).

## Setup
";

#[tokio::test]
async fn test_full_document_render() {
    let mut pipeline = pipeline();
    let mut viewport = Viewport::new();
    let request = RenderRequest {
        doc_id: "guide",
        path: "guide.md",
        markdown: DOC,
        filetype: &FileType::Md,
        dark_mode: true,
    };
    pipeline.render_document(request, &mut viewport).await;
    let html = viewport.content().to_html();

    // headings carry slug ids for inline links
    assert!(html.contains("<h1 id=\"user-guide\">User Guide</h1>"));
    assert!(html.contains("<h2 id=\"setup\">Setup</h2>"));

    // both math forms typeset
    assert!(html.contains("math math-inline"));
    assert!(html.contains("math math-display"));

    // diagram rendered under the dark variable set and marked
    assert!(html.contains("mermaid-container"));
    assert!(html.contains("mermaid-rendered"));
    assert!(html.contains("data-diagram-theme=\"dark\""));

    // folder pseudo-tree wrapped, not diagram-rendered
    assert!(html.contains("<div class=\"folder-container\">"));

    // table shape
    assert!(html.contains("<div class=\"md-table-container\">"));
    assert!(html.contains("<th align=\"left\">Feature</th>"));
    assert!(html.contains("<td align=\"right\">done</td>"));

    // internal links survive percent-normalization untouched
    assert!(html.contains("href=\"#inlineId:setup\""));
    assert!(html.contains("href=\"#docId:api\""));
}

#[tokio::test]
async fn test_render_is_deterministic_across_passes() {
    let mut first = Viewport::new();
    let mut second = Viewport::new();
    let request = RenderRequest {
        doc_id: "guide",
        path: "guide.md",
        markdown: DOC,
        filetype: &FileType::Md,
        dark_mode: false,
    };
    pipeline().render_document(request, &mut first).await;
    pipeline().render_document(request, &mut second).await;
    assert_eq!(first.content(), second.content());
}

#[tokio::test]
async fn test_literal_typescript_is_one_fenced_block() {
    let mut pipeline = pipeline();
    let mut viewport = Viewport::new();
    let source = "```typescript\nconst m = \"$$not math$$\";\n// ```mermaid fences too\n```";
    let request = RenderRequest {
        doc_id: "app",
        path: "app.ts",
        markdown: source,
        filetype: &FileType::Ts,
        dark_mode: false,
    };
    pipeline.render_document(request, &mut viewport).await;
    let html = viewport.content().to_html();

    assert!(html.contains("language-typescript"));
    assert!(!html.contains("math-display"));
    assert!(!html.contains("mermaid-rendered"));
}

#[tokio::test]
async fn test_broken_diagram_never_rejects() {
    use docpane::dom::DomNode;
    use docpane::render::{DiagramEngine, DiagramError, DiagramTheme};

    struct BrokenEngine;
    impl DiagramEngine for BrokenEngine {
        fn apply_theme(&mut self, _theme: &DiagramTheme) {}
        async fn render(&self, _sources: &[String]) -> Result<Vec<DomNode>, DiagramError> {
            Err(DiagramError::new("engine unavailable"))
        }
    }

    let mut pipeline = RenderPipeline::new(
        MathOverlay::new(PlainMathEngine),
        DiagramOverlay::new(BrokenEngine),
    );
    let mut viewport = Viewport::new();
    let request = RenderRequest {
        doc_id: "guide",
        path: "guide.md",
        markdown: "```mermaid\ngraph TD;\n```",
        filetype: &FileType::Md,
        dark_mode: false,
    };
    // resolves; failure surfaces inline with id and path
    pipeline.render_document(request, &mut viewport).await;
    let html = viewport.content().to_html();
    assert!(html.contains("render-error"));
    assert!(html.contains("guide"));
    assert!(html.contains("guide.md"));
}
