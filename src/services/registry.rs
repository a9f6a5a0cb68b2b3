//! Document registry: id → metadata lookup.
//!
//! A plain key-value table. The viewer treats it as read-only; hosts populate
//! it up front, either programmatically or from a JSON manifest shipped next
//! to the docs.

use rustc_hash::FxHashMap;

use crate::models::DocMeta;

#[derive(Debug)]
pub enum RegistryError {
    Manifest(serde_json::Error),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Manifest(e) => write!(f, "Invalid docs manifest: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Default)]
pub struct DocsRegistry {
    docs: FxHashMap<String, DocMeta>,
}

impl DocsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_docs(docs: impl IntoIterator<Item = DocMeta>) -> Self {
        let mut registry = Self::new();
        for doc in docs {
            registry.register(doc);
        }
        registry
    }

    /// Parse a JSON array of `DocMeta` records.
    pub fn from_manifest(json: &str) -> Result<Self, RegistryError> {
        let docs: Vec<DocMeta> = serde_json::from_str(json).map_err(RegistryError::Manifest)?;
        Ok(Self::with_docs(docs))
    }

    pub fn register(&mut self, meta: DocMeta) {
        self.docs.insert(meta.id.clone(), meta);
    }

    pub fn unregister(&mut self, id: &str) {
        self.docs.remove(id);
    }

    pub fn has(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&DocMeta> {
        self.docs.get(id)
    }

    pub fn all(&self) -> Vec<&DocMeta> {
        let mut docs: Vec<&DocMeta> = self.docs.values().collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileType;

    #[test]
    fn test_register_and_get() {
        let mut registry = DocsRegistry::new();
        registry.register(DocMeta::new("initialdoc", "Index", FileType::Md, "INDEX.md"));
        assert!(registry.has("initialdoc"));
        assert_eq!(registry.get("initialdoc").unwrap().title, "Index");
        assert!(registry.get("missing").is_none());
        registry.unregister("initialdoc");
        assert!(!registry.has("initialdoc"));
    }

    #[test]
    fn test_from_manifest() {
        let registry = DocsRegistry::from_manifest(
            r#"[
                {"id":"initialdoc","title":"Index","filetype":"md","path":"INDEX.md"},
                {"id":"app","title":"App Source","filetype":"ts","path":"app.ts"}
            ]"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("app").unwrap().filetype, FileType::Ts);
    }

    #[test]
    fn test_bad_manifest_is_an_error() {
        assert!(DocsRegistry::from_manifest("not json").is_err());
    }
}
