//! Data model layer.

pub mod meta;
pub mod session;
pub mod token;

pub use meta::{DocMeta, FileType};
pub use session::{
    SessionComponent, SessionPatch, SessionState, ThemeMode, SESSION_STATE_KEY, THEME_KEY,
};
pub use token::{ColumnAlign, DocumentToken, TableCell};
