//! Application layer: the shell owning app-wide session concerns and the
//! per-document viewer it hosts.

pub mod shell;
pub mod viewer;

pub use shell::Shell;
pub use viewer::{DocsViewer, LinkOutcome, HIGHLIGHT_CLASS};

/// App-level knobs.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Document opened when nothing else is recorded.
    pub home_doc_id: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            home_doc_id: "initialdoc".to_string(),
        }
    }
}
