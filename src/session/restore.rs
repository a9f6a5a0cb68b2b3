//! Refresh recovery: the one-shot Restore transition run right after the
//! view tree is mounted.
//!
//! The `refreshed` flag is written as the very last thing before teardown;
//! whoever reads it true must consume it (write it back false) so a second
//! restore in the same run sees a normal start.

use crate::models::{SessionComponent, SessionPatch};

use super::SessionStore;

/// Fallback document when a refresh happened mid-document but the id was
/// never persisted.
pub const DEFAULT_DOC_ID: &str = "initialdoc";

/// What the host should do after the restore check.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// Normal start; show the default view, touch nothing.
    None,
    /// A refresh happened on the main view; state was reset to home.
    Home,
    /// A refresh happened mid-document; reopen it at the recorded offset.
    Document { doc_id: String, scroll_pos: f64 },
}

/// Run the Restore transition once against the persisted record.
///
/// Callers guard the once-per-run property (see `Shell`); this function is
/// pure state-machine: read, branch on `refreshed` + component, consume the
/// flag on every branch that saw it set.
pub fn restore_session(store: &SessionStore) -> RestoreOutcome {
    let state = store.read();
    if !state.refreshed {
        return RestoreOutcome::None;
    }

    match state.component {
        SessionComponent::MainView => {
            store.write(
                SessionPatch::new()
                    .doc_id(None)
                    .prev_doc_id(None)
                    .scroll_pos(0.0)
                    .refreshed(false),
            );
            RestoreOutcome::Home
        }
        SessionComponent::DocsViewer => {
            store.write(SessionPatch::new().refreshed(false));
            let doc_id = state
                .doc_id
                .unwrap_or_else(|| DEFAULT_DOC_ID.to_string());
            RestoreOutcome::Document {
                doc_id,
                scroll_pos: state.scroll_pos,
            }
        }
        SessionComponent::Other(name) => {
            tracing::debug!(component = %name, "refresh in unknown component, flag cleared");
            store.write(SessionPatch::new().refreshed(false));
            RestoreOutcome::None
        }
    }
}
