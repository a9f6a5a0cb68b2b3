//! The app shell: owns the session baseline, the theme mirror on the
//! document root, view toggling and the one-shot refresh restore.

use crate::dom::Element;
use crate::models::{SessionComponent, SessionPatch, ThemeMode};
use crate::render::{DiagramEngine, MathEngine};
use crate::services::DocFetcher;
use crate::session::{restore_session, RestoreOutcome, SessionStore};

use super::viewer::DocsViewer;
use super::ViewerConfig;

pub struct Shell<F, M, D> {
    config: ViewerConfig,
    session: SessionStore,
    viewer: DocsViewer<F, M, D>,
    /// Stand-in for the document root; carries the `data-theme` attribute
    /// styling keys off.
    root: Element,
    viewer_visible: bool,
    restored: bool,
}

impl<F: DocFetcher, M: MathEngine, D: DiagramEngine> Shell<F, M, D> {
    /// Builds the shell, mirrors the stored theme onto the root and writes
    /// the baseline session record so later partial writes merge into a
    /// fully defined state.
    pub fn new(config: ViewerConfig, session: SessionStore, viewer: DocsViewer<F, M, D>) -> Self {
        let mut root = Element::new("html");
        root.set_attr("data-theme", session.theme().as_str());
        session.write(SessionPatch::new());

        Self {
            config,
            session,
            viewer,
            root,
            viewer_visible: false,
            restored: false,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn is_viewer_visible(&self) -> bool {
        self.viewer_visible
    }

    pub fn viewer(&self) -> &DocsViewer<F, M, D> {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut DocsViewer<F, M, D> {
        &mut self.viewer
    }

    /// ToggleView transition: flip between the main view and the document
    /// view, persist which one is active, and when entering the viewer open
    /// the last recorded document (or the home document).
    pub async fn toggle_view(&mut self) {
        self.viewer_visible = !self.viewer_visible;
        let component = if self.viewer_visible {
            SessionComponent::DocsViewer
        } else {
            SessionComponent::MainView
        };
        self.session
            .write(SessionPatch::new().component(component));

        if self.viewer_visible {
            let doc_id = self
                .session
                .read()
                .doc_id
                .unwrap_or_else(|| self.config.home_doc_id.clone());
            self.viewer.set_input_doc(&doc_id).await;
        }
    }

    /// BeforeUnload transition. Must be the last session write before the
    /// process (or page) goes away.
    pub fn on_before_unload(&self) {
        self.session.write(SessionPatch::new().refreshed(true));
    }

    /// The one-shot Restore transition, run right after mount. A second call
    /// in the same run does nothing.
    pub async fn restore_from_session_state(&mut self) -> RestoreOutcome {
        if self.restored {
            return RestoreOutcome::None;
        }
        self.restored = true;

        let outcome = restore_session(&self.session);
        match &outcome {
            RestoreOutcome::None | RestoreOutcome::Home => {}
            RestoreOutcome::Document { doc_id, scroll_pos } => {
                // Seed scroll memory before the render so the post-render
                // restoration picks the refreshed offset up.
                self.viewer
                    .scroll_tracker_mut()
                    .set_position(doc_id, *scroll_pos, 0.0);
                self.viewer_visible = true;
                let doc_id = doc_id.clone();
                self.viewer.set_input_doc(&doc_id).await;
            }
        }
        outcome
    }

    /// Flip the theme through the viewer and mirror it on the root.
    pub async fn toggle_theme(&mut self) -> ThemeMode {
        let theme = self.viewer.toggle_theme().await;
        self.root.set_attr("data-theme", theme.as_str());
        theme
    }
}
