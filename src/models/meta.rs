//! Document metadata as the registry hands it out.

use serde::{Deserialize, Serialize};

/// How a registered document should be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Md,
    Ts,
    #[serde(untagged)]
    Other(String),
}

impl FileType {
    /// Literal-source types are shown as one fenced code block and skip the
    /// math and diagram overlays entirely.
    pub fn is_literal_source(&self) -> bool {
        matches!(self, FileType::Ts)
    }

    /// Fence language used when displaying a literal source file.
    pub fn fence_language(&self) -> Option<&str> {
        match self {
            FileType::Ts => Some("typescript"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub filetype: FileType,
    pub path: String,
}

impl DocMeta {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        filetype: FileType,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            filetype,
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filetype_literal_source() {
        assert!(FileType::Ts.is_literal_source());
        assert!(!FileType::Md.is_literal_source());
        assert!(!FileType::Other("html".into()).is_literal_source());
    }

    #[test]
    fn test_meta_json_round_trip() {
        let json = r#"{"id":"initialdoc","title":"Index","filetype":"md","path":"docs/INDEX.md"}"#;
        let meta: DocMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.filetype, FileType::Md);
        let other: DocMeta =
            serde_json::from_str(r#"{"id":"x","title":"X","filetype":"html","path":"p"}"#).unwrap();
        assert_eq!(other.filetype, FileType::Other("html".into()));
    }

    #[test]
    fn test_filetype_defaults_to_md() {
        let meta: DocMeta =
            serde_json::from_str(r#"{"id":"x","title":"X","path":"p"}"#).unwrap();
        assert_eq!(meta.filetype, FileType::Md);
    }
}
