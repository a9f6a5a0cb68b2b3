//! Render pipeline orchestrator.
//!
//! One call renders one document into one viewport, fully awaited end to
//! end: lex → token render → text sanitize → math overlay → diagram theme +
//! layout → layout flush. The orchestrator is also the containment boundary:
//! a broken document produces an inline error message and a log line, never
//! an error for the caller — navigation must stay alive.

use crate::dom::{DomNode, Element, Fragment, Viewport};
use crate::models::FileType;

use super::diagram::{DiagramEngine, DiagramError, DiagramOverlay};
use super::html::render_tokens;
use super::lexer::lex;
use super::math::{MathEngine, MathError, MathOverlay};

#[derive(Debug)]
pub enum PipelineError {
    Math(MathError),
    Diagram(DiagramError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Math(e) => write!(f, "{}", e),
            PipelineError::Diagram(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Everything one render pass needs to know.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub doc_id: &'a str,
    pub path: &'a str,
    pub markdown: &'a str,
    pub filetype: &'a FileType,
    pub dark_mode: bool,
}

pub struct RenderPipeline<M, D> {
    math: MathOverlay<M>,
    diagram: DiagramOverlay<D>,
}

impl<M: MathEngine, D: DiagramEngine> RenderPipeline<M, D> {
    pub fn new(math: MathOverlay<M>, diagram: DiagramOverlay<D>) -> Self {
        Self { math, diagram }
    }

    /// Render `req.markdown` into the viewport. Always resolves; failures
    /// are shown inline and logged.
    pub async fn render_document(&mut self, req: RenderRequest<'_>, viewport: &mut Viewport) {
        if let Err(err) = self.try_render(&req, viewport).await {
            tracing::error!(
                doc_id = req.doc_id,
                path = req.path,
                %err,
                "document render failed"
            );
            viewport.set_content(error_fragment(req.doc_id, req.path, &err.to_string()));
        }
    }

    async fn try_render(
        &mut self,
        req: &RenderRequest<'_>,
        viewport: &mut Viewport,
    ) -> Result<(), PipelineError> {
        let tokens = lex(req.markdown);
        viewport.set_content(render_tokens(&tokens));
        viewport.content_mut().sanitize_text();

        // Literal source files are displayed as one fenced block; the
        // overlays would mangle them.
        if !req.filetype.is_literal_source() {
            self.math
                .typeset(viewport.content_mut())
                .map_err(PipelineError::Math)?;
            self.diagram.apply_theme(req.dark_mode);
            self.diagram
                .render_pending(viewport.content_mut())
                .await
                .map_err(PipelineError::Diagram)?;
        }

        // Flush layout so scroll restoration right after this call measures
        // the new content, not the old.
        let _ = viewport.force_layout();
        Ok(())
    }
}

/// Inline error shown in place of a document that failed to load or render.
pub fn error_fragment(doc_id: &str, path: &str, detail: &str) -> Fragment {
    let em = Element::new("em").with_text(format!(
        "Failed to display document \"{}\" (path: {}): {}",
        doc_id, path, detail
    ));
    Fragment::from_nodes(vec![DomNode::Element(
        Element::new("p")
            .with_class("render-error")
            .with_child(DomNode::Element(em)),
    )])
}

/// Inline message for an id the registry does not know.
pub fn not_found_fragment(doc_id: &str) -> Fragment {
    let em = Element::new("em").with_text(format!("Documentation not found. docId={}", doc_id));
    Fragment::from_nodes(vec![DomNode::Element(
        Element::new("p")
            .with_class("render-error")
            .with_child(DomNode::Element(em)),
    )])
}
