//! Core checks over catalog content.
//!
//! This module contains:
//! - Integrity: uniqueness, ordering, completeness and placeholder detection

pub mod integrity;

// Re-export commonly used types
pub use integrity::{
    check, IntegrityFlag, IntegrityOptions, IntegrityReport, IntegrityViolation, VideoSlot,
};
