//! docpane - Markdown documentation viewer core
//!
//! Module structure:
//! - dom: render-target tree and the viewport owning it
//! - models: document tokens, registry metadata, session state
//! - render: lexer, token renderer, math/diagram overlays, pipeline
//! - services: fetch, registry, scroll tracking, key-value storage
//! - session: persisted session record and refresh restore
//! - app: the document viewer and the shell hosting it

pub mod app;
pub mod dom;
pub mod logging;
pub mod models;
pub mod render;
pub mod services;
pub mod session;
