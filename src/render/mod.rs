//! The Markdown-to-DOM render pipeline.
//!
//! Stages, in pipeline order: lexing (delegated to `pulldown-cmark`, adapted
//! into [`crate::models::DocumentToken`]), token rendering, text
//! sanitization, the math overlay, the diagram overlay, and a final layout
//! flush. The orchestrator in [`pipeline`] sequences the stages and contains
//! their failures.

pub mod diagram;
pub mod html;
pub mod lexer;
pub mod math;
pub mod pipeline;

pub use diagram::{DiagramEngine, DiagramError, DiagramOverlay, DiagramTheme, PlainDiagramEngine};
pub use html::{clean_url, render_tokens, slugify};
pub use lexer::lex;
pub use math::{MathConfig, MathEngine, MathError, MathOverlay, PlainMathEngine};
pub use pipeline::{RenderPipeline, RenderRequest};
