//! Service layer: storage, document registry, fetching, scroll tracking.

pub mod fetch;
pub mod registry;
pub mod scroll;
pub mod storage;

pub use fetch::{DocFetcher, FetchError, FileFetcher};
pub use registry::{DocsRegistry, RegistryError};
pub use scroll::{scroll_to_element, ScrollSample, ScrollTracker};
pub use storage::{FileStorage, MemoryStorage, Storage};
