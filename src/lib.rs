//! episode-catalog - Typed content catalog for a programming video series
//!
//! Episodes, their exercises, references and video descriptors are authored
//! as YAML records and loaded into an immutable, read-only catalog.
//!
//! # Modules
//!
//! - `domain`: Content records (Episode, Exercise, Reference, Video, Collection)
//! - `library`: Loading content from disk and the read-only Catalog API
//! - `adapters`: Video hosting conventions (resolution-specific URLs)
//! - `core`: Integrity checks over the loaded content
//! - `config`: Configuration discovery
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List episodes in sequence order
//! episode-catalog list
//!
//! # Show an episode by sequence, id, or slug
//! episode-catalog show ep6-functional-setters --exercises
//!
//! # Check the content for duplicates and placeholders
//! episode-catalog validate --strict
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{HostingError, ResolvedVideo, TemplateHost, VideoHost};
pub use crate::core::{check, IntegrityFlag, IntegrityOptions, IntegrityReport, IntegrityViolation};
pub use domain::{
    Collection, Episode, EpisodeId, Exercise, Permission, Reference, Resolution, Section, Sequence,
    Video, VideoSource,
};
pub use library::{Catalog, CatalogError, ContentLoader, EpisodeKey};
