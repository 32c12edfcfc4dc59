//! Collections group episodes into named sections.

use serde::{Deserialize, Serialize};

use super::episode::Sequence;
use super::reference::Reference;

/// A named grouping of episodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub slug: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurb: Option<String>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Collection {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            blurb: None,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn section(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    /// References of every section, in section order
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.sections.iter().flat_map(|s| s.references.iter())
    }
}

/// An ordered slice of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub slug: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurb: Option<String>,

    /// Episode sequence numbers, in display order
    #[serde(default)]
    pub episodes: Vec<Sequence>,

    #[serde(default)]
    pub references: Vec<Reference>,
}

impl Section {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            blurb: None,
            episodes: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn with_episode(mut self, sequence: u32) -> Self {
        self.episodes.push(Sequence(sequence));
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }
}
