//! Raw document retrieval.
//!
//! A thin I/O seam: the viewer only needs "path in, text out". The shipped
//! implementation reads from a docs root on disk; embedders that serve docs
//! over HTTP implement [`DocFetcher`] themselves.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug)]
pub enum FetchError {
    NotFound(PathBuf),
    Io(io::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotFound(p) => write!(f, "Document not found: {}", p.display()),
            FetchError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        FetchError::Io(e)
    }
}

pub trait DocFetcher {
    fn fetch(&self, path: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Reads documents from a root directory via `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocFetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(FetchError::NotFound(full)),
            Err(err) => Err(err.into()),
        }
    }
}
