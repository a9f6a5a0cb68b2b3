//! Refresh-recovery and navigation scenarios across a simulated restart:
//! durable FileStorage plus a docs directory on disk.

use std::path::Path;

use docpane::app::{DocsViewer, Shell, ViewerConfig};
use docpane::models::{SessionComponent, SessionPatch};
use docpane::render::{
    DiagramOverlay, MathOverlay, PlainDiagramEngine, PlainMathEngine, RenderPipeline,
};
use docpane::services::{DocsRegistry, FileFetcher, FileStorage};
use docpane::session::{RestoreOutcome, SessionStore};

const MANIFEST: &str = r#"[
    {"id":"initialdoc","title":"Index","filetype":"md","path":"INDEX.md"},
    {"id":"doc7","title":"Seven","filetype":"md","path":"doc7.md"}
]"#;

fn write_docs(dir: &Path) {
    std::fs::write(dir.join("INDEX.md"), "# Index\n\n[seven](#docId:doc7)\n").unwrap();
    std::fs::write(dir.join("doc7.md"), "# Seven\n\nbody\n").unwrap();
}

/// One "process": fresh shell over the durable state directory.
fn boot(
    docs_dir: &Path,
    state_dir: &Path,
) -> Shell<FileFetcher, PlainMathEngine, PlainDiagramEngine> {
    let session = SessionStore::new(FileStorage::new(state_dir));
    let registry = DocsRegistry::from_manifest(MANIFEST).unwrap();
    let viewer = DocsViewer::new(
        ViewerConfig::default(),
        registry,
        FileFetcher::new(docs_dir),
        RenderPipeline::new(
            MathOverlay::new(PlainMathEngine),
            DiagramOverlay::new(PlainDiagramEngine::default()),
        ),
        session.clone(),
    );
    Shell::new(ViewerConfig::default(), session, viewer)
}

#[tokio::test]
async fn test_refresh_recovery_reopens_document_at_offset() {
    let docs = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    write_docs(docs.path());

    // first run: open doc7, scroll, then the page goes away
    {
        let mut shell = boot(docs.path(), state.path());
        shell.toggle_view().await;
        shell.viewer_mut().navigate("doc7").await;
        shell.viewer_mut().viewport_mut().set_measurements(1000.0, 200.0);
        shell.viewer_mut().on_scroll(120.0);
        shell.viewer_mut().flush_scroll_frame();
        shell.on_before_unload();
    }

    // second run: restore
    let mut shell = boot(docs.path(), state.path());
    let outcome = shell.restore_from_session_state().await;
    assert_eq!(
        outcome,
        RestoreOutcome::Document {
            doc_id: "doc7".into(),
            scroll_pos: 120.0,
        }
    );
    assert!(shell.is_viewer_visible());
    assert!(shell.viewer().viewport().content().to_html().contains("Seven"));
    assert_eq!(shell.viewer().scroll_tracker().get_position("doc7"), 120.0);

    // once the host measures the restored content, the viewport actually
    // sits at the recorded offset
    shell
        .viewer_mut()
        .viewport_mut()
        .set_measurements(1000.0, 200.0);
    assert_eq!(shell.viewer().viewport().scroll_top(), 120.0);

    // the one-shot flag was consumed durably
    let session = SessionStore::new(FileStorage::new(state.path()));
    assert!(!session.read().refreshed);
}

#[tokio::test]
async fn test_refresh_on_main_view_resets_to_home() {
    let docs = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    write_docs(docs.path());

    {
        let shell = boot(docs.path(), state.path());
        // viewer never opened; refresh happens on the main view
        shell.on_before_unload();
    }

    let mut shell = boot(docs.path(), state.path());
    assert_eq!(
        shell.restore_from_session_state().await,
        RestoreOutcome::Home
    );
    assert!(!shell.is_viewer_visible());

    let state = SessionStore::new(FileStorage::new(state.path())).read();
    assert!(state.doc_id.is_none());
    assert!(state.prev_doc_id.is_none());
    assert!(!state.refreshed);
    assert_eq!(state.scroll_pos, 0.0);
}

#[tokio::test]
async fn test_refresh_in_viewer_without_doc_id_opens_default() {
    let docs = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    write_docs(docs.path());

    {
        let session = SessionStore::new(FileStorage::new(state_dir.path()));
        session.write(
            SessionPatch::new()
                .component(SessionComponent::DocsViewer)
                .refreshed(true),
        );
    }

    let mut shell = boot(docs.path(), state_dir.path());
    let outcome = shell.restore_from_session_state().await;
    assert_eq!(
        outcome,
        RestoreOutcome::Document {
            doc_id: "initialdoc".into(),
            scroll_pos: 0.0,
        }
    );
    assert!(shell.viewer().viewport().content().to_html().contains("Index"));
}

#[tokio::test]
async fn test_navigation_history_survives_restart() {
    let docs = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    write_docs(docs.path());

    {
        let mut shell = boot(docs.path(), state.path());
        shell.toggle_view().await;
        // follow the internal link from the index
        assert_eq!(shell.viewer().internal_links(), ["#docId:doc7"]);
        shell.viewer_mut().handle_link("#docId:doc7").await;
    }

    let session = SessionStore::new(FileStorage::new(state.path()));
    let persisted = session.read();
    assert_eq!(persisted.doc_id.as_deref(), Some("doc7"));
    assert_eq!(persisted.prev_doc_id.as_deref(), Some("initialdoc"));

    // back_to_previous in the next run uses the durable history
    let mut shell = boot(docs.path(), state.path());
    shell.viewer_mut().back_to_previous().await;
    assert_eq!(shell.viewer().active_doc_id(), Some("initialdoc"));
}

#[tokio::test]
async fn test_normal_start_is_untouched() {
    let docs = tempfile::tempdir().unwrap();
    let state = tempfile::tempdir().unwrap();
    write_docs(docs.path());

    {
        let session = SessionStore::new(FileStorage::new(state.path()));
        session.write(SessionPatch::new().doc_id(Some("doc7")).scroll_pos(50.0));
    }

    let mut shell = boot(docs.path(), state.path());
    assert_eq!(
        shell.restore_from_session_state().await,
        RestoreOutcome::None
    );
    assert!(!shell.is_viewer_visible());
    let persisted = SessionStore::new(FileStorage::new(state.path())).read();
    assert_eq!(persisted.doc_id.as_deref(), Some("doc7"));
    assert_eq!(persisted.scroll_pos, 50.0);
}
