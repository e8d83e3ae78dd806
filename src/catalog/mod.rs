//! Product catalog stored as one YAML file per record
//!
//! - `record`: the typed record and its validation
//! - `loader`: reads the products directory into a [`Catalog`]
//! - `editor`: writes records back and commits them

pub mod editor;
pub mod loader;
pub mod record;

pub use editor::{CatalogEditor, SaveOutcome};
pub use loader::{Catalog, CatalogEntry, CatalogLoader, SkippedFile};
pub use record::{Record, DEFAULT_LIFECYCLE_STATUS};
