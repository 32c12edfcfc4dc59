//! Content library: loading authored records and querying them.
//!
//! # Content Layout
//!
//! ```text
//! <content>/
//! ├── references.yaml           # slug -> canonical Reference (optional)
//! ├── episodes/
//! │   └── 0006-functional-setters.yaml
//! └── collections/
//!     └── <collection>.yaml      # sections, episode sequences, references
//! ```

pub mod catalog;
pub mod loader;

pub use catalog::{Catalog, CatalogError, EpisodeKey};
pub use loader::ContentLoader;
