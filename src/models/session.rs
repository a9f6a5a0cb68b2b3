//! Persisted session state.
//!
//! Exactly one `SessionState` record lives under [`SESSION_STATE_KEY`] in the
//! host's single-key storage. It is always fully defined: reads apply
//! defaults field by field, writes go through [`SessionPatch`] so untouched
//! fields survive concurrent partial updates (read-merge-write, never a blind
//! overwrite).

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const SESSION_STATE_KEY: &str = "sessionState";
pub const THEME_KEY: &str = "theme";

/// Which top-level view was active when the state was written.
///
/// Persisted as a plain string; unknown strings survive a round trip so the
/// restore logic can take its fallback branch instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionComponent {
    #[default]
    MainView,
    DocsViewer,
    Other(String),
}

impl SessionComponent {
    pub fn as_str(&self) -> &str {
        match self {
            SessionComponent::MainView => "MainView",
            SessionComponent::DocsViewer => "DocsViewer",
            SessionComponent::Other(name) => name,
        }
    }
}

impl From<&str> for SessionComponent {
    fn from(value: &str) -> Self {
        match value {
            "MainView" => SessionComponent::MainView,
            "DocsViewer" => SessionComponent::DocsViewer,
            other => SessionComponent::Other(other.to_string()),
        }
    }
}

impl Serialize for SessionComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SessionComponent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComponentVisitor;

        impl Visitor<'_> for ComponentVisitor {
            type Value = SessionComponent;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a component name string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(SessionComponent::from(v))
            }
        }

        deserializer.deserialize_str(ComponentVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionState {
    pub component: SessionComponent,
    pub doc_id: Option<String>,
    pub prev_doc_id: Option<String>,
    pub scroll_pos: f64,
    pub refreshed: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            component: SessionComponent::MainView,
            doc_id: None,
            prev_doc_id: None,
            scroll_pos: 0.0,
            refreshed: false,
        }
    }
}

/// A partial update: only the fields present overwrite the persisted record.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub component: Option<SessionComponent>,
    pub doc_id: Option<Option<String>>,
    pub prev_doc_id: Option<Option<String>>,
    pub scroll_pos: Option<f64>,
    pub refreshed: Option<bool>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, component: SessionComponent) -> Self {
        self.component = Some(component);
        self
    }

    pub fn doc_id(mut self, doc_id: Option<&str>) -> Self {
        self.doc_id = Some(doc_id.map(str::to_string));
        self
    }

    pub fn prev_doc_id(mut self, prev: Option<&str>) -> Self {
        self.prev_doc_id = Some(prev.map(str::to_string));
        self
    }

    pub fn scroll_pos(mut self, pos: f64) -> Self {
        self.scroll_pos = Some(pos);
        self
    }

    pub fn refreshed(mut self, refreshed: bool) -> Self {
        self.refreshed = Some(refreshed);
        self
    }

    pub fn apply(self, mut state: SessionState) -> SessionState {
        if let Some(component) = self.component {
            state.component = component;
        }
        if let Some(doc_id) = self.doc_id {
            state.doc_id = doc_id;
        }
        if let Some(prev) = self.prev_doc_id {
            state.prev_doc_id = prev;
        }
        if let Some(pos) = self.scroll_pos {
            state.scroll_pos = pos;
        }
        if let Some(refreshed) = self.refreshed {
            state.refreshed = refreshed;
        }
        state
    }
}

/// Theme preference persisted under [`THEME_KEY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}
