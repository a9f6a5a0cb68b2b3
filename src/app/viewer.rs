//! The per-document viewer: active-document state, navigation, rendering,
//! internal-link handling and scroll memory for one viewport.

use crate::dom::{ScrollAlign, ScrollBehavior, Viewport};
use crate::models::{SessionPatch, ThemeMode};
use crate::render::{DiagramEngine, MathEngine, RenderPipeline, RenderRequest};
use crate::render::pipeline::{error_fragment, not_found_fragment};
use crate::services::{scroll_to_element, DocFetcher, DocsRegistry, ScrollTracker};
use crate::session::SessionStore;

use super::ViewerConfig;

/// Transient class applied to an in-page link target; the host clears it
/// after its highlight animation.
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// What an internal-link click resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// `#docId:` target; the viewer switched documents.
    Navigated(String),
    /// `#inlineId:` target; the viewport scrolled to the element.
    ScrolledTo(String),
    /// Not an internal link, or the target does not exist.
    Ignored,
}

pub struct DocsViewer<F, M, D> {
    config: ViewerConfig,
    registry: DocsRegistry,
    fetcher: F,
    pipeline: RenderPipeline<M, D>,
    session: SessionStore,
    scroll: ScrollTracker,
    viewport: Viewport,
    input_doc_id: Option<String>,
    doc_id_override: Option<String>,
    reload: u64,
    doc_title: Option<String>,
    internal_links: Vec<String>,
    dark_mode: bool,
}

impl<F: DocFetcher, M: MathEngine, D: DiagramEngine> DocsViewer<F, M, D> {
    pub fn new(
        config: ViewerConfig,
        registry: DocsRegistry,
        fetcher: F,
        pipeline: RenderPipeline<M, D>,
        session: SessionStore,
    ) -> Self {
        let dark_mode = session.theme().is_dark();
        Self {
            config,
            registry,
            fetcher,
            pipeline,
            session,
            scroll: ScrollTracker::new(),
            viewport: Viewport::new(),
            input_doc_id: None,
            doc_id_override: None,
            reload: 0,
            doc_title: None,
            internal_links: Vec::new(),
            dark_mode,
        }
    }

    /// The id currently shown: an in-viewer navigation overrides the id the
    /// host routed in.
    pub fn active_doc_id(&self) -> Option<&str> {
        self.doc_id_override
            .as_deref()
            .or(self.input_doc_id.as_deref())
    }

    pub fn doc_title(&self) -> Option<&str> {
        self.doc_title.as_deref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn scroll_tracker(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn scroll_tracker_mut(&mut self) -> &mut ScrollTracker {
        &mut self.scroll
    }

    /// Hrefs of the internal links found in the rendered document.
    pub fn internal_links(&self) -> &[String] {
        &self.internal_links
    }

    pub fn reload_count(&self) -> u64 {
        self.reload
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Host routed a document in. One render per call.
    pub async fn set_input_doc(&mut self, doc_id: &str) {
        self.input_doc_id = Some(doc_id.to_string());
        self.doc_id_override = None;
        self.navigate(doc_id).await;
    }

    /// Navigate transition: persist {docId, prevDocId} unless the id is
    /// unchanged, then load and render.
    pub async fn navigate(&mut self, doc_id: &str) {
        let current = self.session.read().doc_id;
        if current.as_deref() != Some(doc_id) {
            self.session.write(
                SessionPatch::new()
                    .doc_id(Some(doc_id))
                    .prev_doc_id(current.as_deref()),
            );
        }
        self.load_and_render(doc_id).await;
    }

    /// Load a document from the registry and render it into the viewport.
    /// Every failure is shown inline; this never errors.
    pub async fn load_and_render(&mut self, doc_id: &str) {
        let Some(meta) = self.registry.get(doc_id).cloned() else {
            tracing::warn!(doc_id, "document not in registry");
            self.clear_previous_doc();
            self.viewport.set_content(not_found_fragment(doc_id));
            return;
        };
        self.doc_title = Some(meta.title.clone());

        self.clear_previous_doc();

        let mut markdown = match self.fetcher.fetch(&meta.path).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(doc_id, path = %meta.path, %err, "document fetch failed");
                self.viewport
                    .set_content(error_fragment(doc_id, &meta.path, &err.to_string()));
                return;
            }
        };

        // Literal sources are shown as one fenced block of their language.
        if let Some(language) = meta.filetype.fence_language() {
            markdown = format!("```{}\n{}\n```", language, markdown);
        }

        let request = RenderRequest {
            doc_id,
            path: &meta.path,
            markdown: &markdown,
            filetype: &meta.filetype,
            dark_mode: self.dark_mode,
        };
        self.pipeline
            .render_document(request, &mut self.viewport)
            .await;

        self.harvest_internal_links();

        // Restore the remembered offset for this document.
        let saved = self.scroll.get_position(doc_id);
        self.viewport.scroll_to(saved, ScrollBehavior::Auto);
    }

    fn harvest_internal_links(&mut self) {
        let mut links = Vec::new();
        self.viewport.content().for_each_element(&mut |el| {
            if el.tag != "a" {
                return;
            }
            if let Some(href) = el.attr("href") {
                if href.starts_with("#docId:") || href.starts_with("#inlineId:") {
                    links.push(href.to_string());
                }
            }
        });
        self.internal_links = links;
    }

    /// A click on a rendered anchor. `#docId:` switches documents,
    /// `#inlineId:` scrolls to and highlights the target in place.
    pub async fn handle_link(&mut self, href: &str) -> LinkOutcome {
        let Some((kind, target)) = href.split_once(':') else {
            return LinkOutcome::Ignored;
        };
        match kind {
            "#docId" => {
                let target = target.to_string();
                self.doc_id_override = Some(target.clone());
                self.navigate(&target).await;
                LinkOutcome::Navigated(target)
            }
            "#inlineId" => {
                if self.viewport.content().element_by_id(target).is_none() {
                    tracing::warn!(target, "inline link target not found");
                    return LinkOutcome::Ignored;
                }
                scroll_to_element(
                    &mut self.viewport,
                    target,
                    ScrollBehavior::Smooth,
                    ScrollAlign::Center,
                );
                self.set_highlight(target, true);
                LinkOutcome::ScrolledTo(target.to_string())
            }
            _ => LinkOutcome::Ignored,
        }
    }

    /// Hosts call this once the highlight animation finished.
    pub fn clear_highlight(&mut self, element_id: &str) {
        self.set_highlight(element_id, false);
    }

    fn set_highlight(&mut self, element_id: &str, on: bool) {
        self.viewport.content_mut().for_each_element_mut(&mut |el| {
            if el.attr("id") != Some(element_id) {
                return;
            }
            if on {
                el.add_class(HIGHLIGHT_CLASS);
            } else if let Some(classes) = el.attr("class") {
                let kept: Vec<&str> = classes
                    .split_ascii_whitespace()
                    .filter(|c| *c != HIGHLIGHT_CLASS)
                    .collect();
                el.set_attr("class", kept.join(" "));
            }
        });
    }

    /// A scroll event from the host. Returns true when this event scheduled
    /// the frame flush; the host then calls [`Self::flush_scroll_frame`] at
    /// the next frame boundary.
    pub fn on_scroll(&mut self, pos: f64) -> bool {
        let Some(doc_id) = self.active_doc_id().map(str::to_string) else {
            return false;
        };
        let height = self.viewport.scroll_height() - self.viewport.client_height();
        self.scroll.on_scroll(&doc_id, pos, height)
    }

    /// Commit the coalesced scroll sample and mirror the offset into the
    /// session record (the ScrollUpdate transition).
    pub fn flush_scroll_frame(&mut self) {
        if let Some(sample) = self.scroll.flush_frame() {
            self.session
                .write(SessionPatch::new().scroll_pos(sample.pos));
        }
    }

    /// Back to the home document, with its scroll memory reset.
    pub async fn back_to_home(&mut self) {
        let home = self.config.home_doc_id.clone();
        self.scroll.set_position(&home, 0.0, 0.0);
        self.doc_id_override = Some(home.clone());
        self.reload += 1;
        self.navigate(&home).await;
    }

    /// Back to the previously viewed document; no-op when none is recorded.
    pub async fn back_to_previous(&mut self) {
        let Some(prev) = self.session.read().prev_doc_id else {
            return;
        };
        let home = self.config.home_doc_id.clone();
        self.scroll.set_position(&home, 0.0, 0.0);
        self.doc_id_override = Some(prev.clone());
        self.reload += 1;
        self.navigate(&prev).await;
    }

    /// Flip the theme, persist the preference and re-render the current
    /// document so the diagram engine picks the new variable set up.
    /// Returns the new mode so the host can mirror `data-theme`.
    pub async fn toggle_theme(&mut self) -> ThemeMode {
        self.dark_mode = !self.dark_mode;
        let theme = if self.dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        self.session.set_theme(theme);

        self.reload += 1;
        if let Some(doc_id) = self.active_doc_id().map(str::to_string) {
            self.load_and_render(&doc_id).await;
        }
        theme
    }

    /// Teardown for the document being replaced: drop its content and the
    /// link wiring harvested from it.
    pub fn clear_previous_doc(&mut self) {
        self.viewport.clear();
        self.internal_links.clear();
    }
}
