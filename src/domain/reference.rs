//! Citations to external or internal material.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A citation attached to an episode or a collection section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurb: Option<String>,

    pub link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    pub title: String,
}

impl Reference {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            author: None,
            blurb: None,
            link: link.into(),
            published_at: None,
            title: title.into(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Copy of this reference with the blurb replaced
    pub fn with_blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = Some(blurb.into());
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown shared reference: {0}")]
pub struct UnknownReference(pub String);

/// Canonical references shared between episodes, keyed by slug
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedReferences(BTreeMap<String, Reference>);

impl SharedReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slug: impl Into<String>, reference: Reference) {
        self.0.insert(slug.into(), reference);
    }

    pub fn get(&self, slug: &str) -> Option<&Reference> {
        self.0.get(slug)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pointer at a shared reference with an optional blurb override
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedRef {
    pub shared: String,

    #[serde(default)]
    pub blurb: Option<String>,
}

/// A reference as authored: either spelled out inline, or pointing at a
/// shared reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReferenceEntry {
    Shared(SharedRef),
    Inline(Reference),
}

impl ReferenceEntry {
    /// Produce the concrete reference this entry stands for
    pub fn resolve(self, shared: &SharedReferences) -> Result<Reference, UnknownReference> {
        match self {
            ReferenceEntry::Inline(reference) => Ok(reference),
            ReferenceEntry::Shared(SharedRef { shared: slug, blurb }) => {
                let reference = shared
                    .get(&slug)
                    .cloned()
                    .ok_or_else(|| UnknownReference(slug.clone()))?;

                Ok(match blurb {
                    Some(blurb) => reference.with_blurb(blurb),
                    None => reference,
                })
            }
        }
    }
}
