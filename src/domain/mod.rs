//! Content model for the episode catalog.
//!
//! This module contains the record types:
//! - Episode / Exercise: published videos and their practice problems
//! - Reference: citations, shared between episodes with blurb overrides
//! - Video: trailer and full-episode descriptors
//! - Collection / Section: named groupings of episodes

pub mod collection;
pub mod episode;
pub mod reference;
pub mod video;

// Re-export commonly used types
pub use collection::{Collection, Section};
pub use episode::{Episode, EpisodeId, Exercise, Permission, Sequence};
pub use reference::{Reference, ReferenceEntry, SharedRef, SharedReferences, UnknownReference};
pub use video::{HostedAssets, Resolution, Video, VideoError, VideoKind, VideoRecord, VideoSource};
